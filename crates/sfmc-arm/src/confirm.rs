//! Confirmation gating for mutating calls

/// Host hook deciding whether a mutating call may proceed
pub trait Confirm: Send + Sync {
    /// Ask whether `action` may be performed on `target`
    fn should_process(&self, target: &str, action: &str) -> bool;

    /// Ask an additional question before a destructive action
    fn should_continue(&self, query: &str, caption: &str) -> bool;
}

/// Approves everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn should_process(&self, _target: &str, _action: &str) -> bool {
        true
    }

    fn should_continue(&self, _query: &str, _caption: &str) -> bool {
        true
    }
}

/// Declines every prompt, approves plain processing
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Confirm for Decline {
    fn should_process(&self, _target: &str, _action: &str) -> bool {
        true
    }

    fn should_continue(&self, _query: &str, _caption: &str) -> bool {
        false
    }
}

/// Run-the-action check for destructive actions: `force` skips the question
pub fn confirm_action(
    confirm: &dyn Confirm,
    force: bool,
    query: &str,
    caption: &str,
    target: &str,
) -> bool {
    (force || confirm.should_continue(query, caption)) && confirm.should_process(target, caption)
}
