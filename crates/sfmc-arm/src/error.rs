//! Error types for sfmc-arm

use sfmc_core::{CoreError, ProvisioningState, ResourceKind};
use thiserror::Error;

use crate::outcome::SoftFailure;

/// Result type for sfmc-arm operations
pub type Result<T> = std::result::Result<T, ArmError>;

/// Errors that can occur while resolving, fetching or mutating resources
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArmError {
    /// Resource not found by the provider
    #[error("{kind} '{id}' not found")]
    NotFound { kind: ResourceKind, id: String },

    /// A precondition failure raised inside a helper of a mutating operation
    #[error("{0}")]
    Precondition(SoftFailure),

    /// Remote provisioning ended in a failed state
    #[error("Managed {kind} {name} is in provisioning state {state}")]
    ProvisioningFailed {
        kind: ResourceKind,
        name: String,
        state: ProvisioningState,
    },

    /// A mutation or parameter violated an invariant
    #[error("{message}")]
    InvalidArgument {
        message: String,
        /// "Did you mean" style hint
        help: Option<String>,
    },

    /// The operation is not valid for the current state of the resource
    #[error("{message}")]
    InvalidOperation {
        message: String,
        help: Option<String>,
    },

    /// Identity resolution error
    #[error(transparent)]
    Identity(#[from] CoreError),

    /// Document (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the collaborator, passed through unchanged
    #[error("remote error: {0}")]
    Remote(String),
}

impl From<serde_json::Error> for ArmError {
    fn from(e: serde_json::Error) -> Self {
        ArmError::Serialization(e.to_string())
    }
}

impl ArmError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ArmError::InvalidArgument {
            message: message.into(),
            help: None,
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        ArmError::InvalidOperation {
            message: message.into(),
            help: None,
        }
    }

    /// Attach a hint to argument and operation errors
    pub fn with_help(mut self, hint: Option<String>) -> Self {
        match &mut self {
            ArmError::InvalidArgument { help, .. } | ArmError::InvalidOperation { help, .. } => {
                *help = hint;
            }
            _ => {}
        }
        self
    }

    /// Hint to show next to the error, if any
    pub fn help(&self) -> Option<&str> {
        match self {
            ArmError::InvalidArgument { help, .. } | ArmError::InvalidOperation { help, .. } => {
                help.as_deref()
            }
            _ => None,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::NotFound { .. })
    }

    /// Whether the error originated in the collaborator rather than locally
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ArmError::Remote(_) | ArmError::Io(_) | ArmError::Serialization(_)
        )
    }

    /// Log the error with its source chain
    pub fn log_detail(&self) {
        let mut chain = Vec::new();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        if chain.is_empty() {
            tracing::error!(error = %self, "collaborator call failed");
        } else {
            tracing::error!(error = %self, caused_by = %chain.join(": "), "collaborator call failed");
        }
    }
}
