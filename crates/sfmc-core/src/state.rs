//! Provisioning state reported by the control plane

use serde::{Deserialize, Serialize};

/// Remote status of the last change to a resource
///
/// Unknown values deserialize to [`ProvisioningState::Other`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProvisioningState {
    #[default]
    Succeeded,
    Failed,
    Canceled,
    Creating,
    Updating,
    Deleting,
    InProgress,
    #[serde(other)]
    Other,
}

impl ProvisioningState {
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Whether the collaborator has finished with the resource
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
            Self::Creating => "Creating",
            Self::Updating => "Updating",
            Self::Deleting => "Deleting",
            Self::InProgress => "InProgress",
            Self::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_state_deserializes_as_other() {
        let state: ProvisioningState = serde_json::from_str("\"Migrating\"").unwrap();
        assert_eq!(state, ProvisioningState::Other);
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProvisioningState::Failed.is_terminal());
        assert!(ProvisioningState::Failed.is_failed());
        assert!(!ProvisioningState::Updating.is_terminal());
        assert!(!ProvisioningState::Succeeded.is_failed());
    }
}
