//! Service representation

use serde::{Deserialize, Serialize};

use crate::identity::{ResourceIdentity, ResourceKind};
use crate::resource::{impl_arm_resource, string_enum, SystemData};
use crate::state::ProvisioningState;
use crate::tags::Tags;

string_enum! {
    /// Cost of moving a replica, used by the resource balancer
    MoveCost, "defaultMoveCost" {
        Zero => "Zero",
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

string_enum! {
    ServicePackageActivationMode, "servicePackageActivationMode" {
        SharedProcess => "SharedProcess",
        ExclusiveProcess => "ExclusiveProcess",
    }
}

/// How a service is partitioned
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "partitionScheme")]
pub enum Partition {
    #[default]
    Singleton,

    #[serde(rename_all = "camelCase")]
    UniformInt64Range {
        count: i32,
        low_key: i64,
        high_key: i64,
    },

    Named {
        names: Vec<String>,
    },
}

/// Kind-specific service properties, discriminated by `serviceKind`
///
/// Durations are ISO 8601 strings such as `PT1M`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "serviceKind")]
pub enum ServiceKind {
    #[serde(rename_all = "camelCase")]
    Stateless {
        instance_count: i32,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_instance_count: Option<i32>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_instance_percentage: Option<i32>,
    },

    #[serde(rename_all = "camelCase")]
    Stateful {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_replica_set_size: Option<i32>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_replica_set_size: Option<i32>,

        #[serde(default)]
        has_persisted_state: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        replica_restart_wait_duration: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        quorum_loss_wait_duration: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        stand_by_replica_keep_duration: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        service_placement_time_limit: Option<String>,
    },
}

impl ServiceKind {
    pub fn is_stateful(&self) -> bool {
        matches!(self, Self::Stateful { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProperties {
    pub service_type_name: String,

    #[serde(default)]
    pub partition_description: Partition,

    #[serde(flatten)]
    pub kind: ServiceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_move_cost: Option<MoveCost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_package_activation_mode: Option<ServicePackageActivationMode>,
}

/// A service of an application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub tags: Tags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,

    pub properties: ServiceProperties,
}

impl_arm_resource!(Service, ResourceKind::Service);

impl Service {
    pub fn new(
        identity: &ResourceIdentity,
        location: impl Into<String>,
        properties: ServiceProperties,
    ) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::Service.resource_type()),
            location: location.into(),
            tags: Tags::new(),
            system_data: None,
            provisioning_state: None,
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stateless_service_wire_shape() {
        let properties = ServiceProperties {
            service_type_name: "VotingWebType".to_string(),
            partition_description: Partition::Singleton,
            kind: ServiceKind::Stateless {
                instance_count: -1,
                min_instance_count: None,
                min_instance_percentage: None,
            },
            placement_constraints: None,
            default_move_cost: Some(MoveCost::Low),
            service_package_activation_mode: None,
        };

        let value = serde_json::to_value(&properties).unwrap();
        assert_eq!(value["serviceKind"], "Stateless");
        assert_eq!(value["instanceCount"], -1);
        assert_eq!(value["partitionDescription"]["partitionScheme"], "Singleton");
        assert_eq!(value["defaultMoveCost"], "Low");
    }

    #[test]
    fn test_stateful_service_parses() {
        let service: Service = serde_json::from_value(json!({
            "name": "VotingData",
            "properties": {
                "serviceTypeName": "VotingDataType",
                "serviceKind": "Stateful",
                "targetReplicaSetSize": 3,
                "minReplicaSetSize": 2,
                "hasPersistedState": true,
                "partitionDescription": {
                    "partitionScheme": "UniformInt64Range",
                    "count": 5,
                    "lowKey": 0,
                    "highKey": 25
                }
            }
        }))
        .unwrap();

        assert!(service.properties.kind.is_stateful());
        assert_eq!(
            service.properties.partition_description,
            Partition::UniformInt64Range {
                count: 5,
                low_key: 0,
                high_key: 25
            }
        );
    }
}
