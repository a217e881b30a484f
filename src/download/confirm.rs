//! Operator confirmation.

/// Answers yes/no questions put to the operator.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy)]
pub struct AssumeAnswer(pub bool);

impl Confirm for AssumeAnswer {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("{} -> {}", question, if self.0 { "yes" } else { "no" });
        self.0
    }
}
