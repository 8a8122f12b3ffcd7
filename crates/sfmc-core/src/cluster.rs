//! Managed cluster representation and its sub-collections

use serde::{Deserialize, Serialize};

use crate::identity::{ResourceIdentity, ResourceKind};
use crate::resource::{impl_arm_resource, string_enum, SystemData};
use crate::state::ProvisioningState;
use crate::tags::Tags;

pub const DEFAULT_ADMIN_USER_NAME: &str = "vmadmin";
pub const DEFAULT_HTTP_GATEWAY_PORT: i32 = 19080;
pub const DEFAULT_CLIENT_CONNECTION_PORT: i32 = 19000;

/// Lowest priority accepted for a network security rule
pub const NSG_PRIORITY_MIN: i32 = 1000;
/// Highest priority accepted for a network security rule
pub const NSG_PRIORITY_MAX: i32 = 3000;

string_enum! {
    /// Cluster SKU
    ClusterSku, "sku" {
        Basic => "Basic",
        Standard => "Standard",
    }
}

string_enum! {
    /// How cluster code upgrades are rolled out
    UpgradeMode, "upgradeMode" {
        Automatic => "Automatic",
        Manual => "Manual",
    }
}

string_enum! {
    /// Wave a cluster joins for automatic upgrades
    UpgradeCadence, "upgradeCadence" {
        Wave0 => "Wave0",
        Wave1 => "Wave1",
        Wave2 => "Wave2",
    }
}

string_enum! {
    /// Network protocol of a security rule; `any` is accepted for `*`
    NsgProtocol, "protocol" {
        Http => "http",
        Https => "https",
        Tcp => "tcp",
        Udp => "udp",
        Icmp => "icmp",
        Ah => "ah",
        Esp => "esp",
        Any => "*" | "any",
    }
}

string_enum! {
    Access, "access" {
        Allow => "allow",
        Deny => "deny",
    }
}

string_enum! {
    Direction, "direction" {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

impl Default for ClusterSku {
    fn default() -> Self {
        Self::Basic
    }
}

/// A managed cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagedCluster {
    pub id: String,

    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    pub location: String,

    pub tags: Tags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,

    pub sku: ClusterSku,

    /// DNS label of the cluster endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,

    /// Fully qualified domain name, assigned remotely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_user_name: Option<String>,

    /// Write-only on the remote side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_gateway_connection_port: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_connection_port: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_upgrade_mode: Option<UpgradeMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_upgrade_cadence: Option<UpgradeCadence>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_code_version: Option<String>,

    pub zonal_resiliency: bool,

    /// Client certificates allowed to manage the cluster
    pub clients: Vec<ClientCertificate>,

    pub network_security_rules: Vec<NetworkSecurityRule>,
}

impl_arm_resource!(ManagedCluster, ResourceKind::ManagedCluster);

impl ManagedCluster {
    /// Fresh representation addressed by `identity`
    pub fn new(identity: &ResourceIdentity, location: impl Into<String>) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::ManagedCluster.resource_type()),
            location: location.into(),
            ..Default::default()
        }
    }

    /// Upgrade mode, treating an unset mode as automatic
    pub fn upgrade_mode(&self) -> UpgradeMode {
        self.cluster_upgrade_mode.unwrap_or(UpgradeMode::Automatic)
    }
}

/// A client certificate registered with a cluster
///
/// Exactly one of `thumbprint` or `common_name` identifies the certificate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientCertificate {
    #[serde(default)]
    pub is_admin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,

    /// Comma separated issuer thumbprints, only with `common_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_thumbprint: Option<String>,
}

impl ClientCertificate {
    pub fn by_thumbprint(thumbprint: impl Into<String>, is_admin: bool) -> Self {
        Self {
            is_admin,
            thumbprint: Some(thumbprint.into()),
            ..Default::default()
        }
    }

    pub fn by_common_name(
        common_name: impl Into<String>,
        issuer_thumbprints: &[String],
        is_admin: bool,
    ) -> Self {
        Self {
            is_admin,
            common_name: Some(common_name.into()),
            issuer_thumbprint: (!issuer_thumbprints.is_empty()).then(|| issuer_thumbprints.join(",")),
            ..Default::default()
        }
    }

    /// Thumbprint or common name, whichever identifies this certificate
    pub fn key(&self) -> &str {
        self.thumbprint
            .as_deref()
            .or(self.common_name.as_deref())
            .unwrap_or_default()
    }
}

/// A network security rule of a cluster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityRule {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub protocol: NsgProtocol,

    pub access: Access,

    pub direction: Direction,

    /// Evaluation order, lower first
    pub priority: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_address_prefixes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_address_prefixes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_port_ranges: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_port_ranges: Vec<String>,
}
