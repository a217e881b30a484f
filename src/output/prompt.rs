//! Interactive operator prompt.

use console::{style, Term};

use crate::download::Confirm;

/// Asks questions on the terminal; only `Y` or `YES` counts as yes.
pub struct ConsolePrompt {
    term: Term,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for ConsolePrompt {
    fn confirm(&self, question: &str) -> bool {
        let prompt = format!("{} {} ", question, style("[Y/YES]").bold());
        if let Err(e) = self.term.write_str(&prompt) {
            tracing::warn!("Failed to write prompt: {}", e);
            return false;
        }

        match self.term.read_line() {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                false
            }
        }
    }
}

/// Whether an answer means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_uppercase().as_str(), "Y" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES\n"));
        assert!(is_affirmative("  Yes "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yeah"));
    }
}
