//! Core error types

use thiserror::Error;

use crate::identity::ResourceKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Malformed {kind} resource id '{id}': {reason}")]
    MalformedResourceId {
        id: String,
        kind: ResourceKind,
        /// Template segment that was missing, empty or mismatched
        segment: String,
        reason: String,
    },

    #[error("Input object for {kind} has no resource id")]
    MissingIdentity { kind: ResourceKind },

    #[error("Missing required parameter: {parameter}")]
    MissingParameter { parameter: String },

    #[error("Invalid tag '{input}': expected key=value")]
    InvalidTag { input: String },

    #[error("Invalid value '{value}' for {field}: expected one of {expected}")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
