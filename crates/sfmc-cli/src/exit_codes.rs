//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid identity, parameter or mutation
pub const VALIDATION_ERROR: i32 = 2;

/// At least one item ended in a soft failure (already exists / does not exist)
pub const SOFT_FAILURE: i32 = 3;

/// Provisioning of a resource ended in a failed state
pub const PROVISIONING_FAILED: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Error reported by the resource provider
pub const REMOTE_ERROR: i32 = 6;

/// Configuration file could not be read or parsed
pub const CONFIG_ERROR: i32 = 78;
