//! User-facing notifications and confirmation prompts.

/// Channel for success messages and yes/no confirmations.
pub trait Feedback {
    /// Tell the user something happened.
    fn notify(&self, message: &str);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, question: &str) -> bool;
}

/// Feedback that only logs, answering every confirmation with a fixed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback {
    /// Answer given to every [`Feedback::confirm`] call.
    pub answer: bool,
}

impl LogFeedback {
    /// Feedback that confirms everything.
    #[must_use]
    pub const fn accepting() -> Self {
        Self { answer: true }
    }

    /// Feedback that declines everything.
    #[must_use]
    pub const fn declining() -> Self {
        Self { answer: false }
    }
}

impl Feedback for LogFeedback {
    fn notify(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn confirm(&self, question: &str) -> bool {
        tracing::info!("{question} -> {}", if self.answer { "yes" } else { "no" });
        self.answer
    }
}
