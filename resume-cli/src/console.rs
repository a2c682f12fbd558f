//! Terminal-backed user feedback.

use std::io::{self, BufRead, Write};

use resume_core::Feedback;

/// Prints notifications and reads confirmations from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFeedback {
    assume_yes: bool,
}

impl ConsoleFeedback {
    /// Feedback that prompts on every confirmation.
    #[must_use]
    pub const fn interactive() -> Self {
        Self { assume_yes: false }
    }

    /// Feedback that answers yes without prompting.
    #[must_use]
    pub const fn assume_yes() -> Self {
        Self { assume_yes: true }
    }
}

impl Feedback for ConsoleFeedback {
    fn notify(&self, message: &str) {
        tracing::info!("{message}");
        println!("{message}");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{question} [y/N] ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {e}");
                false
            }
        }
    }
}

/// Whether a typed answer means yes.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
