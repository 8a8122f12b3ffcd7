//! Arguments shared by every command
//!
//! A target is selected by exactly one parameter set: by name
//! (`-g`/`-c` plus per-command names), `--resource-id`, or
//! `--input-object FILE|-` holding one JSON representation or an array of
//! them, as emitted by another invocation.

use clap::Args;
use sfmc_core::{IdentityArgs, ResourceKind, Tags, parse_tags};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Parameter sets selecting the managed cluster a command works on
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Resource group of the cluster
    #[arg(short = 'g', long)]
    pub resource_group: Option<String>,

    /// Name of the cluster
    #[arg(short = 'c', long)]
    pub cluster_name: Option<String>,

    /// Full resource id of the target
    #[arg(long, conflicts_with_all = ["resource_group", "cluster_name", "input_object"])]
    pub resource_id: Option<String>,

    /// JSON representation(s) of the target; `-` reads stdin
    #[arg(long, value_name = "FILE|-", conflicts_with_all = ["resource_group", "cluster_name"])]
    pub input_object: Option<PathBuf>,
}

impl TargetArgs {
    /// Whether the by-name parameter set was used
    pub fn by_name(&self) -> bool {
        self.resource_id.is_none() && self.input_object.is_none()
    }

    /// Identifying inputs for every item this invocation processes
    ///
    /// `parent` and `name` only apply to the by-name parameter set.
    pub fn identities(
        &self,
        kind: ResourceKind,
        parent: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<IdentityArgs>> {
        if let Some(id) = &self.resource_id {
            return Ok(vec![IdentityArgs::ByResourceId(id.clone())]);
        }
        if let Some(path) = &self.input_object {
            return read_input_objects(path, kind);
        }

        let mut args = IdentityArgs::by_name(
            self.resource_group.clone().unwrap_or_default(),
            self.cluster_name.clone().unwrap_or_default(),
        );
        if let Some(parent) = parent {
            args = args.with_parent(parent);
        }
        if let Some(name) = name {
            args = args.with_name(name);
        }
        Ok(vec![args])
    }
}

/// Flags shared by mutating commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct MutationFlags {
    /// Emit `true` instead of the updated resource
    #[arg(long)]
    pub pass_thru: bool,

    /// Report what would change without changing anything
    #[arg(long)]
    pub what_if: bool,

    /// Prompt before each change
    #[arg(long)]
    pub confirm: bool,
}

/// Parse repeated `key=value` arguments
pub fn key_values(inputs: &[String]) -> Result<Tags> {
    Ok(parse_tags(inputs)?)
}

/// Parse an optional JSON argument
pub fn json_value(flag: &str, input: Option<&str>) -> Result<Option<serde_json::Value>> {
    input
        .map(|raw| {
            serde_json::from_str(raw).map_err(|e| {
                CliError::input_with_help(
                    format!("--{} is not valid JSON: {}", flag, e),
                    "Quote the whole object, e.g. '{\"key\": \"value\"}'",
                )
            })
        })
        .transpose()
}

fn read_input_objects(path: &Path, kind: ResourceKind) -> Result<Vec<IdentityArgs>> {
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    input_objects(&content, kind)
}

/// Extract the `id` of each input object
fn input_objects(content: &str, kind: ResourceKind) -> Result<Vec<IdentityArgs>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let objects = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    if objects.is_empty() {
        return Err(CliError::input(format!("No {} input objects given", kind)));
    }

    Ok(objects
        .iter()
        .map(|object| IdentityArgs::ByObject {
            id: object.get("id").and_then(|id| id.as_str()).map(str::to_string),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfmc_core::ResourceIdentity;

    #[test]
    fn test_input_object_array() {
        let content = r#"[
            {"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.ServiceFabric/managedClusters/c1"},
            {"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.ServiceFabric/managedClusters/c2"}
        ]"#;

        let args = input_objects(content, ResourceKind::ManagedCluster).unwrap();
        let identities: Vec<_> = args
            .iter()
            .map(|a| ResourceIdentity::resolve(ResourceKind::ManagedCluster, a, "s").unwrap())
            .collect();
        assert_eq!(identities[1], ResourceIdentity::cluster("s", "rg", "c2"));
    }

    #[test]
    fn test_input_object_without_id() {
        let args = input_objects(r#"{"name": "c1"}"#, ResourceKind::ManagedCluster).unwrap();
        assert_eq!(args, vec![IdentityArgs::ByObject { id: None }]);
    }

    #[test]
    fn test_by_name_carries_parent_and_name() {
        let target = TargetArgs {
            resource_group: Some("rg".into()),
            cluster_name: Some("c1".into()),
            ..Default::default()
        };
        let args = target
            .identities(ResourceKind::Service, Some("app"), Some("web"))
            .unwrap();
        assert_eq!(
            args,
            vec![IdentityArgs::by_name("rg", "c1").with_parent("app").with_name("web")]
        );
    }

    #[test]
    fn test_invalid_json_setting() {
        assert!(json_value("settings", Some("{not json")).is_err());
        assert_eq!(json_value("settings", None).unwrap(), None);
    }
}
