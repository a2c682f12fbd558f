//! Structured resume data edited through the form.

use serde::{Deserialize, Serialize};

/// Contact block shown at the top of the resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personal {
    /// Full name.
    pub name: String,
    /// Job title or headline.
    pub title: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// City or region.
    pub location: String,
    /// Single glyph (usually an emoji) used as avatar. Empty for none.
    pub avatar: String,
}

/// Editable field of [`Personal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    /// Full name.
    Name,
    /// Job title.
    Title,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Location.
    Location,
    /// Avatar glyph.
    Avatar,
}

/// One work experience entry. All fields are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Employer.
    pub company: String,
    /// Role held.
    pub position: String,
    /// Start date.
    pub start_date: String,
    /// End date.
    pub end_date: String,
    /// What the role involved.
    pub description: String,
}

/// Editable field of [`Experience`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    /// Employer.
    Company,
    /// Role held.
    Position,
    /// Start date.
    StartDate,
    /// End date.
    EndDate,
    /// Description.
    Description,
}

/// One education entry. All fields are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    /// Institution.
    pub school: String,
    /// Degree earned.
    pub degree: String,
    /// Field of study.
    pub major: String,
    /// Graduation date.
    pub graduation_date: String,
}

/// Editable field of [`Education`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    /// Institution.
    School,
    /// Degree.
    Degree,
    /// Field of study.
    Major,
    /// Graduation date.
    GraduationDate,
}

/// Everything the form edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeData {
    /// Contact block.
    pub personal: Personal,
    /// Summary paragraph.
    pub summary: String,
    /// Work history in display order.
    pub experience: Vec<Experience>,
    /// Education in display order.
    pub education: Vec<Education>,
    /// Skills in display order. Duplicates are allowed.
    pub skills: Vec<String>,
}

impl ResumeData {
    /// Starter content shown on first launch.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            personal: Personal {
                name: "Alex Chen".to_string(),
                title: "Frontend Engineer".to_string(),
                email: "alex.chen@example.com".to_string(),
                phone: "555-0134-8000".to_string(),
                location: "Beijing".to_string(),
                avatar: "👨‍💻".to_string(),
            },
            summary: "Passionate about frontend development with hands-on React and Vue \
                      experience, a strong team player who enjoys solving hard problems."
                .to_string(),
            experience: vec![Experience {
                company: "Tech Co., Ltd.".to_string(),
                position: "Frontend Engineer".to_string(),
                start_date: "2020-06".to_string(),
                end_date: "Present".to_string(),
                description: "Owns frontend development of the core product, from \
                              requirements analysis through technology selection."
                    .to_string(),
            }],
            education: vec![Education {
                school: "University".to_string(),
                degree: "Bachelor".to_string(),
                major: "Computer Science and Technology".to_string(),
                graduation_date: "2020-06".to_string(),
            }],
            skills: ["React", "Vue", "JavaScript", "CSS", "HTML", "Git"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Set one personal field.
    pub fn set_personal(&mut self, field: PersonalField, value: impl Into<String>) {
        let slot = match field {
            PersonalField::Name => &mut self.personal.name,
            PersonalField::Title => &mut self.personal.title,
            PersonalField::Email => &mut self.personal.email,
            PersonalField::Phone => &mut self.personal.phone,
            PersonalField::Location => &mut self.personal.location,
            PersonalField::Avatar => &mut self.personal.avatar,
        };
        *slot = value.into();
    }

    /// Replace the summary paragraph.
    pub fn set_summary(&mut self, value: impl Into<String>) {
        self.summary = value.into();
    }

    /// Set one field of the experience entry at `index`.
    ///
    /// Returns `false` if there is no entry at `index`.
    pub fn set_experience_field(
        &mut self,
        index: usize,
        field: ExperienceField,
        value: impl Into<String>,
    ) -> bool {
        let Some(entry) = self.experience.get_mut(index) else {
            return false;
        };
        let slot = match field {
            ExperienceField::Company => &mut entry.company,
            ExperienceField::Position => &mut entry.position,
            ExperienceField::StartDate => &mut entry.start_date,
            ExperienceField::EndDate => &mut entry.end_date,
            ExperienceField::Description => &mut entry.description,
        };
        *slot = value.into();
        true
    }

    /// Set one field of the education entry at `index`.
    ///
    /// Returns `false` if there is no entry at `index`.
    pub fn set_education_field(
        &mut self,
        index: usize,
        field: EducationField,
        value: impl Into<String>,
    ) -> bool {
        let Some(entry) = self.education.get_mut(index) else {
            return false;
        };
        let slot = match field {
            EducationField::School => &mut entry.school,
            EducationField::Degree => &mut entry.degree,
            EducationField::Major => &mut entry.major,
            EducationField::GraduationDate => &mut entry.graduation_date,
        };
        *slot = value.into();
        true
    }

    /// Append an experience entry.
    pub fn add_experience(&mut self, entry: Experience) {
        self.experience.push(entry);
    }

    /// Remove the experience entry at `index`, if any.
    pub fn remove_experience(&mut self, index: usize) -> Option<Experience> {
        (index < self.experience.len()).then(|| self.experience.remove(index))
    }

    /// Append an education entry.
    pub fn add_education(&mut self, entry: Education) {
        self.education.push(entry);
    }

    /// Remove the education entry at `index`, if any.
    pub fn remove_education(&mut self, index: usize) -> Option<Education> {
        (index < self.education.len()).then(|| self.education.remove(index))
    }

    /// Append a skill. Empty input is ignored; duplicates are kept.
    pub fn add_skill(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        if skill.is_empty() {
            return false;
        }
        self.skills.push(skill);
        true
    }

    /// Remove the skill at `index`, if any.
    pub fn remove_skill(&mut self, index: usize) -> Option<String> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }
}
