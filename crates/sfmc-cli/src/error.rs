//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use sfmc_arm::ArmError;
use sfmc_core::CoreError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Identity, parameter or mutation rejected before submission
    #[error("{message}")]
    #[diagnostic(code(sfmc::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The operation cannot proceed in the current state
    #[error("{message}")]
    #[diagnostic(code(sfmc::cli::operation))]
    Operation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Remote provisioning ended in a failed state
    #[error("{message}")]
    #[diagnostic(
        code(sfmc::cli::provisioning),
        help("Inspect the resource, then retry with --force to recreate it")
    )]
    Provisioning { message: String },

    /// Error reported by the resource provider
    #[error("{message}")]
    #[diagnostic(code(sfmc::cli::remote))]
    Remote { message: String },

    /// Config file could not be loaded
    #[error("Config error: {message}")]
    #[diagnostic(code(sfmc::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(sfmc::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(sfmc::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Operation { .. } => exit_codes::ERROR,
            CliError::Provisioning { .. } => exit_codes::PROVISIONING_FAILED,
            CliError::Remote { .. } => exit_codes::REMOTE_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an input error (user provided invalid input)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>, help: Option<String>) -> Self {
        Self::Config {
            message: message.into(),
            help,
        }
    }
}

impl From<ArmError> for CliError {
    fn from(err: ArmError) -> Self {
        let message = err.to_string();
        let help = err.help().map(str::to_string);
        match err {
            ArmError::InvalidArgument { .. } | ArmError::Identity(_) => {
                CliError::Validation { message, help }
            }
            ArmError::InvalidOperation { .. } | ArmError::Precondition(_) | ArmError::NotFound { .. } => {
                CliError::Operation { message, help }
            }
            ArmError::ProvisioningFailed { .. } => CliError::Provisioning { message },
            ArmError::Remote(_) => CliError::Remote { message },
            ArmError::Io(_) => CliError::Io { message },
            _ => CliError::Internal { message },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::input(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::input(format!("Invalid JSON input: {}", err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
