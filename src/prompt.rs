use eyre::Result;

/// Asks the user to confirm a destructive step
pub trait Prompt {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Answers every confirmation affirmatively (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}

/// English and Turkish affirmatives: "y", "yes", "e", "evet"
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "e" | "evet")
}
