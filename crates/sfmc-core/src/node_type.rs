//! Node type representation and VM extensions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identity::{ResourceIdentity, ResourceKind};
use crate::resource::{impl_arm_resource, string_enum, SystemData};
use crate::state::ProvisioningState;
use crate::tags::Tags;

pub const DEFAULT_VM_SIZE: &str = "Standard_D2_v2";
pub const DEFAULT_VM_IMAGE_PUBLISHER: &str = "MicrosoftWindowsServer";
pub const DEFAULT_VM_IMAGE_OFFER: &str = "WindowsServer";
pub const DEFAULT_VM_IMAGE_SKU: &str = "2022-Datacenter";
pub const DEFAULT_VM_IMAGE_VERSION: &str = "latest";
pub const DEFAULT_DISK_SIZE_GB: i32 = 100;

string_enum! {
    /// Managed disk type of the node data disk
    DiskType, "diskType" {
        StandardLrs => "Standard_LRS",
        StandardSsdLrs => "StandardSSD_LRS",
        PremiumLrs => "Premium_LRS",
    }
}

/// Inclusive port range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRange {
    pub start_port: i32,
    pub end_port: i32,
}

impl std::str::FromStr for EndpointRange {
    type Err = String;

    /// Parse `start-end`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid port range '{}': expected start-end", s))?;
        let start_port = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid start port '{}'", start))?;
        let end_port = end
            .trim()
            .parse()
            .map_err(|_| format!("invalid end port '{}'", end))?;
        if start_port > end_port {
            return Err(format!("invalid port range '{}': start exceeds end", s));
        }
        Ok(Self { start_port, end_port })
    }
}

/// User assigned identities attached to the node VMs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VmManagedIdentity {
    #[serde(default)]
    pub user_assigned_identities: Vec<String>,
}

/// A node type of a managed cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeType {
    pub id: String,

    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    pub tags: Tags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,

    /// Primary node types host the system services
    pub is_primary: bool,

    pub vm_instance_count: i32,

    pub data_disk_size_gb: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_disk_type: Option<DiskType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_image_publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_image_offer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_image_sku: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_image_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_ports: Option<EndpointRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral_ports: Option<EndpointRange>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub capacities: IndexMap<String, String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub placement_properties: IndexMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_managed_identity: Option<VmManagedIdentity>,

    pub is_stateless: bool,

    pub multiple_placement_groups: bool,

    pub vm_extensions: Vec<VmExtension>,
}

impl_arm_resource!(NodeType, ResourceKind::NodeType);

impl NodeType {
    /// Fresh representation with the default VM image, size and disk
    pub fn new(identity: &ResourceIdentity, instance_count: i32, is_primary: bool) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::NodeType.resource_type()),
            is_primary,
            vm_instance_count: instance_count,
            data_disk_size_gb: DEFAULT_DISK_SIZE_GB,
            data_disk_type: Some(DiskType::StandardSsdLrs),
            vm_size: Some(DEFAULT_VM_SIZE.to_string()),
            vm_image_publisher: Some(DEFAULT_VM_IMAGE_PUBLISHER.to_string()),
            vm_image_offer: Some(DEFAULT_VM_IMAGE_OFFER.to_string()),
            vm_image_sku: Some(DEFAULT_VM_IMAGE_SKU.to_string()),
            vm_image_version: Some(DEFAULT_VM_IMAGE_VERSION.to_string()),
            ..Default::default()
        }
    }
}

/// A VM extension installed on every node of a node type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmExtension {
    pub name: String,

    pub publisher: String,

    #[serde(rename = "type")]
    pub extension_type: String,

    pub type_handler_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_upgrade_minor_version: Option<bool>,

    /// Changing the tag forces the handler to rerun
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_update_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,

    /// Never returned by the remote side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_settings: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provision_after_extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup_order: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_type_defaults() {
        let identity = ResourceIdentity::cluster("s", "rg", "c1").child(ResourceKind::NodeType, "nt1");
        let node_type = NodeType::new(&identity, 5, true);

        assert_eq!(node_type.name, "nt1");
        assert_eq!(node_type.vm_size.as_deref(), Some(DEFAULT_VM_SIZE));
        assert_eq!(node_type.data_disk_size_gb, 100);
        assert_eq!(node_type.data_disk_type, Some(DiskType::StandardSsdLrs));
        assert_eq!(node_type.vm_image_sku.as_deref(), Some("2022-Datacenter"));
    }

    #[test]
    fn test_endpoint_range_parse() {
        let range: EndpointRange = "20000-30000".parse().unwrap();
        assert_eq!(range.start_port, 20000);
        assert_eq!(range.end_port, 30000);

        assert!("30000-20000".parse::<EndpointRange>().is_err());
        assert!("80".parse::<EndpointRange>().is_err());
    }

    #[test]
    fn test_extension_type_field_name() {
        let ext = VmExtension {
            name: "csetest".to_string(),
            publisher: "Microsoft.Compute".to_string(),
            extension_type: "BGInfo".to_string(),
            type_handler_version: "2.1".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&ext).unwrap();
        assert_eq!(value["type"], "BGInfo");
        assert_eq!(value["typeHandlerVersion"], "2.1");
    }
}
