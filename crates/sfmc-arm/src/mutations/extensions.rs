//! VM extension appliers

use sfmc_core::{NodeType, VmExtension};

use super::{Mutation, did_you_mean, same_name};
use crate::error::{ArmError, Result};

fn extension_not_found(node_type: &NodeType, name: &str) -> ArmError {
    ArmError::invalid_argument(format!("extension with name {} not found", name)).with_help(
        did_you_mean(name, node_type.vm_extensions.iter().map(|e| e.name.as_str())),
    )
}

/// Install a new extension on a node type
#[derive(Debug, Clone)]
pub struct AddVmExtension {
    pub extension: VmExtension,
}

impl Mutation<NodeType> for AddVmExtension {
    fn describe(&self) -> String {
        format!(
            "Add VM extension '{}' ({}/{})",
            self.extension.name, self.extension.publisher, self.extension.extension_type
        )
    }

    fn apply(&self, node_type: &mut NodeType) -> Result<()> {
        if node_type
            .vm_extensions
            .iter()
            .any(|ext| same_name(&ext.name, &self.extension.name))
        {
            return Err(ArmError::invalid_argument(format!(
                "extension with name {} already exists",
                self.extension.name
            )));
        }

        node_type.vm_extensions.push(self.extension.clone());
        Ok(())
    }
}

/// Change an installed extension
///
/// Publisher and type always come from the installed extension.
#[derive(Debug, Clone, Default)]
pub struct UpdateVmExtension {
    pub name: String,
    pub type_handler_version: Option<String>,
    pub auto_upgrade_minor_version: Option<bool>,
    pub force_update_tag: Option<String>,
    pub settings: Option<serde_json::Value>,
    pub protected_settings: Option<serde_json::Value>,
    pub provision_after_extensions: Option<Vec<String>>,
    pub setup_order: Option<Vec<String>>,
}

impl UpdateVmExtension {
    /// No field would change
    pub fn is_empty(&self) -> bool {
        self.type_handler_version.is_none()
            && self.auto_upgrade_minor_version.is_none()
            && self.force_update_tag.is_none()
            && self.settings.is_none()
            && self.protected_settings.is_none()
            && self.provision_after_extensions.is_none()
            && self.setup_order.is_none()
    }
}

impl Mutation<NodeType> for UpdateVmExtension {
    fn describe(&self) -> String {
        format!("Update VM extension '{}'", self.name)
    }

    fn apply(&self, node_type: &mut NodeType) -> Result<()> {
        let Some(extension) = node_type
            .vm_extensions
            .iter_mut()
            .find(|ext| same_name(&ext.name, &self.name))
        else {
            return Err(extension_not_found(node_type, &self.name));
        };

        if let Some(version) = &self.type_handler_version {
            extension.type_handler_version = version.clone();
        }
        if let Some(auto_upgrade) = self.auto_upgrade_minor_version {
            extension.auto_upgrade_minor_version = Some(auto_upgrade);
        }
        if let Some(tag) = &self.force_update_tag {
            extension.force_update_tag = Some(tag.clone());
        }
        if let Some(settings) = &self.settings {
            extension.settings = Some(settings.clone());
        }
        if let Some(settings) = &self.protected_settings {
            extension.protected_settings = Some(settings.clone());
        }
        if let Some(after) = &self.provision_after_extensions {
            extension.provision_after_extensions = after.clone();
        }
        if let Some(order) = &self.setup_order {
            extension.setup_order = order.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extension(name: &str) -> VmExtension {
        VmExtension {
            name: name.to_string(),
            publisher: "Microsoft.Compute".to_string(),
            extension_type: "BGInfo".to_string(),
            type_handler_version: "2.1".to_string(),
            ..Default::default()
        }
    }

    fn node_type_with(extensions: Vec<VmExtension>) -> NodeType {
        NodeType {
            vm_extensions: extensions,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_extension() {
        let mut node_type = node_type_with(vec![]);
        AddVmExtension {
            extension: extension("bginfo"),
        }
        .apply(&mut node_type)
        .unwrap();

        assert_eq!(node_type.vm_extensions.len(), 1);
    }

    #[test]
    fn test_add_duplicate_extension_rejected() {
        let mut node_type = node_type_with(vec![extension("BGInfo")]);
        let err = AddVmExtension {
            extension: extension("bginfo"),
        }
        .apply(&mut node_type)
        .unwrap_err();

        assert_eq!(err.to_string(), "extension with name bginfo already exists");
        assert_eq!(node_type.vm_extensions.len(), 1);
    }

    #[test]
    fn test_update_preserves_publisher_and_type() {
        let mut node_type = node_type_with(vec![extension("BGInfo")]);
        UpdateVmExtension {
            name: "bginfo".into(),
            type_handler_version: Some("2.2".into()),
            settings: Some(json!({ "verbose": true })),
            ..Default::default()
        }
        .apply(&mut node_type)
        .unwrap();

        let updated = &node_type.vm_extensions[0];
        assert_eq!(updated.publisher, "Microsoft.Compute");
        assert_eq!(updated.extension_type, "BGInfo");
        assert_eq!(updated.type_handler_version, "2.2");
        assert_eq!(updated.settings, Some(json!({ "verbose": true })));
    }

    #[test]
    fn test_update_setup_order() {
        let mut node_type = node_type_with(vec![VmExtension {
            provision_after_extensions: vec!["bginfo".into()],
            ..extension("CustomScript")
        }]);
        let update = UpdateVmExtension {
            name: "customscript".into(),
            setup_order: Some(vec!["BeforeSFRuntime".into()]),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut node_type).unwrap();

        let updated = &node_type.vm_extensions[0];
        assert_eq!(updated.setup_order, vec!["BeforeSFRuntime".to_string()]);
        assert_eq!(updated.provision_after_extensions, vec!["bginfo".to_string()]);
        assert_eq!(updated.type_handler_version, "2.1");
    }

    #[test]
    fn test_update_without_fields_is_empty() {
        let update = UpdateVmExtension {
            name: "bginfo".into(),
            ..Default::default()
        };
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_missing_extension() {
        let mut node_type = node_type_with(vec![extension("BGInfo")]);
        let err = UpdateVmExtension {
            name: "BGInf".into(),
            ..Default::default()
        }
        .apply(&mut node_type)
        .unwrap_err();

        assert_eq!(err.to_string(), "extension with name BGInf not found");
        assert_eq!(err.help(), Some("Did you mean 'BGInfo'?"));
    }
}
