/// Yes/no questions put to the player.
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysYes;

impl Prompter for AlwaysYes {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question, "confirmed");
        true
    }
}

/// Declines everything; the safe default for unattended play.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysNo;

impl Prompter for AlwaysNo {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question, "declined");
        false
    }
}
