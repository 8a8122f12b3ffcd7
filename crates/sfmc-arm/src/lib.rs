//! sfmc ARM - Resource mutation resolver for Service Fabric managed clusters
//!
//! This crate provides:
//! - **Providers**: The collaborator contract (`ResourceProvider`) with
//!   in-memory and file-backed implementations
//! - **Client**: `ArmClient`, typed access to representations and paged listings
//! - **Gate**: Create-if-absent and fetch-mutate-put policies with soft failures
//! - **Mutations**: Appliers for client certificates, network security rules,
//!   VM extensions, tags and cluster fields
//! - **Operations**: Per-resource create, get, list and update calls
//! - **Projection**: What a command emits on success

pub mod client;
pub mod confirm;
pub mod error;
pub mod gate;
pub mod mutations;
mod operations;
pub mod options;
pub mod outcome;
pub mod projection;
pub mod provider;

pub use client::ArmClient;
pub use confirm::{AssumeYes, Confirm, Decline, confirm_action};
pub use error::{ArmError, Result};
pub use mutations::{
    AddClientCertificate, AddNetworkSecurityRule, AddVmExtension, CertificateSelector, Mutation,
    NetworkSecurityRuleUpdate, RemoveClientCertificate, RemoveNetworkSecurityRule, TagMutation,
    UpdateCluster, UpdateNetworkSecurityRule, UpdateVmExtension, find_rule,
};
pub use options::{
    ApplicationOptions, ApplicationTypeVersionOptions, NewClusterOptions, NewNodeTypeOptions,
    ServiceOptions,
};
pub use outcome::{ErrorCategory, Outcome, SoftFailure};
pub use projection::Projection;
pub use provider::{
    DEFAULT_PAGE_SIZE, Document, FileProvider, MockProvider, OperationCounts, Page, ResourceProvider,
};
