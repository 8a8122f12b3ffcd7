//! sfmc Core - Core types for Service Fabric managed cluster resources
//!
//! This crate provides the foundational types used throughout sfmc:
//! - `ResourceIdentity`: Canonical resource addressing and parameter-set resolution
//! - `ManagedCluster`, `NodeType`, `Application`, ...: Resource representations
//! - `ProvisioningState`: Remote status of the last change
//! - `Tags`: Resource tags with merge support

pub mod application;
pub mod cluster;
pub mod error;
pub mod identity;
pub mod node_type;
pub mod resource;
pub mod service;
pub mod state;
pub mod tags;

pub use application::{Application, ApplicationType, ApplicationTypeVersion};
pub use cluster::{
    Access, ClientCertificate, ClusterSku, Direction, ManagedCluster, NetworkSecurityRule,
    NsgProtocol, UpgradeCadence, UpgradeMode,
};
pub use error::CoreError;
pub use identity::{CollectionRef, IdentityArgs, ResourceIdentity, ResourceKind};
pub use node_type::{DiskType, EndpointRange, NodeType, VmExtension, VmManagedIdentity};
pub use resource::{ArmResource, SystemData};
pub use service::{
    MoveCost, Partition, Service, ServiceKind, ServicePackageActivationMode, ServiceProperties,
};
pub use state::ProvisioningState;
pub use tags::{Tags, merge_tags, parse_tag, parse_tags};
