//! Terminal confirmation for `--what-if` and `--confirm`

use console::{Term, style};
use sfmc_arm::Confirm;

/// Confirmation hook driven by the common command flags
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm {
    /// Report actions without performing them
    pub what_if: bool,

    /// Prompt before every mutating call
    pub confirm: bool,
}

impl TerminalConfirm {
    fn prompt(&self, question: &str) -> bool {
        let term = Term::stderr();
        if !term.is_term() {
            tracing::debug!("no terminal attached, declining: {}", question);
            return false;
        }
        if term
            .write_str(&format!("{} {} [y/N] ", style("?").yellow(), question))
            .is_err()
        {
            return false;
        }
        match term.read_line() {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("failed to read answer: {}", e);
                false
            }
        }
    }
}

impl Confirm for TerminalConfirm {
    fn should_process(&self, target: &str, action: &str) -> bool {
        if self.what_if {
            eprintln!(
                "What if: Performing the operation \"{}\" on target \"{}\".",
                action, target
            );
            return false;
        }
        if self.confirm {
            return self.prompt(&format!("{} on \"{}\"?", action, target));
        }
        true
    }

    fn should_continue(&self, query: &str, caption: &str) -> bool {
        if self.what_if {
            return true;
        }
        self.prompt(&format!("{} {}", caption, query))
    }
}
