//! Tri-state results of gated operations
//!
//! Precondition failures (`ResourceAlreadyExists`, `ResourceDoesNotExist`)
//! are soft: they produce an error record and let batch processing go on.
//! Everything else is fatal.

use serde::Serialize;
use sfmc_core::{ResourceIdentity, ResourceKind};

use crate::error::{ArmError, Result};

/// Category of a soft failure record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    ResourceAlreadyExists,
    ResourceDoesNotExist,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ResourceAlreadyExists => "ResourceAlreadyExists",
            Self::ResourceDoesNotExist => "ResourceDoesNotExist",
        };
        write!(f, "{}", s)
    }
}

/// Structured, non-terminating error record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftFailure {
    pub category: ErrorCategory,

    /// Resource id the record is about
    pub target: String,

    pub message: String,
}

impl SoftFailure {
    pub fn already_exists(identity: &ResourceIdentity) -> Self {
        Self {
            category: ErrorCategory::ResourceAlreadyExists,
            target: identity.resource_id(),
            message: format!("{} already exists.", subject(identity)),
        }
    }

    /// The target itself is missing
    pub fn does_not_exist(identity: &ResourceIdentity) -> Self {
        Self {
            category: ErrorCategory::ResourceDoesNotExist,
            target: identity.resource_id(),
            message: format!("{} does not exist.", subject(identity)),
        }
    }

    /// The cluster owning `identity` is missing
    pub fn parent_does_not_exist(identity: &ResourceIdentity) -> Self {
        let cluster = identity.cluster_identity();
        Self {
            category: ErrorCategory::ResourceDoesNotExist,
            target: cluster.resource_id(),
            message: format!("Parent cluster '{}' does not exist.", cluster.cluster_name),
        }
    }
}

impl std::fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn subject(identity: &ResourceIdentity) -> String {
    match (identity.kind, &identity.parent_name) {
        (ResourceKind::ManagedCluster, _) => format!("Managed cluster '{}'", identity.cluster_name),
        (kind, Some(parent)) => format!("Managed {} '{}:{}'", kind, parent, identity.name),
        (kind, None) => format!("Managed {} '{}'", kind, identity.name),
    }
}

/// Result of a gated operation
///
/// Operations return `Result<Outcome<T>>`; converting with `Outcome::from`
/// folds the error into [`Outcome::Fatal`] for callers that handle all three
/// branches in one place.
#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),

    /// Precondition failed; `existing` carries the untouched resource when known
    SoftFail {
        failure: SoftFailure,
        existing: Option<T>,
    },

    Fatal(ArmError),
}

impl<T> Outcome<T> {
    pub fn soft(failure: SoftFailure) -> Self {
        Outcome::SoftFail {
            failure,
            existing: None,
        }
    }

    pub fn soft_with(failure: SoftFailure, existing: T) -> Self {
        Outcome::SoftFail {
            failure,
            existing: Some(existing),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn soft_failure(&self) -> Option<&SoftFailure> {
        match self {
            Outcome::SoftFail { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// The produced value, or the existing one on a soft failure
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::SoftFail { existing, .. } => existing.as_ref(),
            Outcome::Fatal(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::SoftFail { failure, existing } => Outcome::SoftFail {
                failure,
                existing: existing.map(f),
            },
            Outcome::Fatal(err) => Outcome::Fatal(err),
        }
    }

    /// Narrow a successful value; an error from `f` becomes fatal
    ///
    /// A soft failure keeps its record and drops an existing value `f`
    /// cannot narrow.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U>) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => match f(value) {
                Ok(narrowed) => Outcome::Ok(narrowed),
                Err(err) => Outcome::Fatal(err),
            },
            Outcome::SoftFail { failure, existing } => Outcome::SoftFail {
                failure,
                existing: existing.and_then(|value| f(value).ok()),
            },
            Outcome::Fatal(err) => Outcome::Fatal(err),
        }
    }

    /// Escalate a soft failure to a fatal error
    ///
    /// Used where a precondition fails inside a helper of a mutating path.
    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::SoftFail { failure, .. } => Err(ArmError::Precondition(failure)),
            Outcome::Fatal(err) => Err(err),
        }
    }
}

impl<T> From<Result<Outcome<T>>> for Outcome<T> {
    fn from(result: Result<Outcome<T>>) -> Self {
        match result {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Fatal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_type() -> ResourceIdentity {
        ResourceIdentity::cluster("s", "rg", "c1").child(ResourceKind::NodeType, "nt1")
    }

    #[test]
    fn test_soft_failure_messages() {
        let identity = node_type();
        assert_eq!(
            SoftFailure::already_exists(&identity).message,
            "Managed node type 'nt1' already exists."
        );
        assert_eq!(
            SoftFailure::parent_does_not_exist(&identity).message,
            "Parent cluster 'c1' does not exist."
        );
        assert_eq!(
            SoftFailure::parent_does_not_exist(&identity).target,
            identity.cluster_identity().resource_id()
        );
    }

    #[test]
    fn test_cluster_as_target() {
        let cluster = node_type().cluster_identity();
        assert_eq!(
            SoftFailure::does_not_exist(&cluster).message,
            "Managed cluster 'c1' does not exist."
        );
        assert_eq!(
            SoftFailure::already_exists(&cluster).message,
            "Managed cluster 'c1' already exists."
        );
    }

    #[test]
    fn test_into_result_escalates_soft_failure() {
        let outcome: Outcome<u32> = Outcome::soft_with(SoftFailure::already_exists(&node_type()), 7);
        assert_eq!(outcome.value(), Some(&7));

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(
            err,
            ArmError::Precondition(SoftFailure {
                category: ErrorCategory::ResourceAlreadyExists,
                ..
            })
        ));
    }

    #[test]
    fn test_and_then_narrows_or_fails() {
        let outcome: Outcome<u32> = Outcome::Ok(4);
        assert!(matches!(outcome.and_then(|v| Ok(v * 2)), Outcome::Ok(8)));

        let outcome: Outcome<u32> = Outcome::Ok(4);
        let narrowed: Outcome<u32> = outcome.and_then(|_| Err(ArmError::invalid_argument("gone")));
        assert!(matches!(narrowed, Outcome::Fatal(ArmError::InvalidArgument { .. })));

        let outcome: Outcome<u32> = Outcome::soft(SoftFailure::does_not_exist(&node_type()));
        assert!(outcome.and_then(|v| Ok(v + 1)).soft_failure().is_some());
    }

    #[test]
    fn test_from_result_folds_fatal() {
        let outcome: Outcome<u32> = Err(ArmError::Remote("boom".into())).into();
        assert!(matches!(outcome, Outcome::Fatal(ArmError::Remote(_))));

        let outcome: Outcome<u32> = Ok(Outcome::Ok(1)).into();
        assert!(outcome.is_ok());
    }
}
