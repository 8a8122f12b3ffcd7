//! Applications, application types and application type versions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identity::{ResourceIdentity, ResourceKind};
use crate::resource::{impl_arm_resource, SystemData};
use crate::state::ProvisioningState;
use crate::tags::Tags;

/// A deployed application
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
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

    /// Resource id of the application type version being run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Application parameter overrides
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, String>,
}

impl_arm_resource!(Application, ResourceKind::Application);

impl Application {
    pub fn new(identity: &ResourceIdentity, location: impl Into<String>) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::Application.resource_type()),
            location: location.into(),
            ..Default::default()
        }
    }
}

/// A registered application type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationType {
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
}

impl_arm_resource!(ApplicationType, ResourceKind::ApplicationType);

impl ApplicationType {
    pub fn new(identity: &ResourceIdentity, location: impl Into<String>) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::ApplicationType.resource_type()),
            location: location.into(),
            ..Default::default()
        }
    }
}

/// One provisioned version of an application type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationTypeVersion {
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

    /// Absolute URL of the application package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_package_url: Option<String>,
}

impl_arm_resource!(ApplicationTypeVersion, ResourceKind::ApplicationTypeVersion);

impl ApplicationTypeVersion {
    pub fn new(
        identity: &ResourceIdentity,
        location: impl Into<String>,
        app_package_url: impl Into<String>,
    ) -> Self {
        Self {
            id: identity.resource_id(),
            name: identity.name.clone(),
            resource_type: Some(ResourceKind::ApplicationTypeVersion.resource_type()),
            location: location.into(),
            app_package_url: Some(app_package_url.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ArmResource;

    #[test]
    fn test_version_identity_from_id() {
        let identity = ResourceIdentity::cluster("s", "rg", "c1")
            .child(ResourceKind::ApplicationType, "VotingType")
            .child(ResourceKind::ApplicationTypeVersion, "1.0.0");
        let version = ApplicationTypeVersion::new(&identity, "eastus", "https://store/voting.sfpkg");

        assert_eq!(version.identity().unwrap(), identity);
        assert!(!version.is_failed());
    }

    #[test]
    fn test_application_without_id_has_no_identity() {
        let app = Application::default();
        assert!(app.identity().is_err());
    }

    #[test]
    fn test_failed_state_detected() {
        let version: ApplicationTypeVersion = serde_json::from_value(serde_json::json!({
            "name": "1.0.0",
            "provisioningState": "Failed"
        }))
        .unwrap();

        assert!(version.is_failed());
    }
}
