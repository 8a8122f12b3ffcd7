//! Network security rule appliers

use sfmc_core::cluster::{NSG_PRIORITY_MAX, NSG_PRIORITY_MIN};
use sfmc_core::{Access, Direction, ManagedCluster, NetworkSecurityRule, NsgProtocol};

use super::{Mutation, did_you_mean, same_name};
use crate::error::{ArmError, Result};

fn validate_priority(priority: i32) -> Result<()> {
    if !(NSG_PRIORITY_MIN..=NSG_PRIORITY_MAX).contains(&priority) {
        return Err(ArmError::invalid_argument(format!(
            "Network security rule priority {} is out of range [{}, {}]",
            priority, NSG_PRIORITY_MIN, NSG_PRIORITY_MAX
        )));
    }
    Ok(())
}

fn rule_not_found(cluster: &ManagedCluster, name: &str) -> ArmError {
    ArmError::invalid_argument(format!("Network Security Rule with name {} not found", name))
        .with_help(did_you_mean(
            name,
            cluster.network_security_rules.iter().map(|r| r.name.as_str()),
        ))
}

/// Look up a rule by name
pub fn find_rule<'a>(cluster: &'a ManagedCluster, name: &str) -> Result<&'a NetworkSecurityRule> {
    cluster
        .network_security_rules
        .iter()
        .find(|rule| same_name(&rule.name, name))
        .ok_or_else(|| rule_not_found(cluster, name))
}

/// Append a new rule
#[derive(Debug, Clone)]
pub struct AddNetworkSecurityRule {
    pub rule: NetworkSecurityRule,
}

impl Mutation<ManagedCluster> for AddNetworkSecurityRule {
    fn describe(&self) -> String {
        format!("Add network security rule '{}'", self.rule.name)
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        validate_priority(self.rule.priority)?;
        if cluster
            .network_security_rules
            .iter()
            .any(|rule| same_name(&rule.name, &self.rule.name))
        {
            return Err(ArmError::invalid_argument(format!(
                "Network Security Rule with name {} already exists",
                self.rule.name
            )));
        }

        cluster.network_security_rules.push(self.rule.clone());
        Ok(())
    }
}

/// Remove a rule by name
#[derive(Debug, Clone)]
pub struct RemoveNetworkSecurityRule {
    pub name: String,
}

impl Mutation<ManagedCluster> for RemoveNetworkSecurityRule {
    fn describe(&self) -> String {
        format!("Remove network security rule '{}'", self.name)
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        let before = cluster.network_security_rules.len();
        let remaining: Vec<NetworkSecurityRule> = cluster
            .network_security_rules
            .iter()
            .filter(|rule| !same_name(&rule.name, &self.name))
            .cloned()
            .collect();

        if remaining.len() == before {
            return Err(rule_not_found(cluster, &self.name));
        }

        cluster.network_security_rules = remaining;
        Ok(())
    }
}

/// Fields of a rule to overwrite; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct NetworkSecurityRuleUpdate {
    pub description: Option<String>,
    pub protocol: Option<NsgProtocol>,
    pub access: Option<Access>,
    pub direction: Option<Direction>,
    pub priority: Option<i32>,
    pub source_address_prefixes: Option<Vec<String>>,
    pub destination_address_prefixes: Option<Vec<String>>,
    pub source_port_ranges: Option<Vec<String>>,
    pub destination_port_ranges: Option<Vec<String>>,
}

impl NetworkSecurityRuleUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.protocol.is_none()
            && self.access.is_none()
            && self.direction.is_none()
            && self.priority.is_none()
            && self.source_address_prefixes.is_none()
            && self.destination_address_prefixes.is_none()
            && self.source_port_ranges.is_none()
            && self.destination_port_ranges.is_none()
    }
}

/// Overwrite supplied fields of an existing rule, keeping its position
#[derive(Debug, Clone)]
pub struct UpdateNetworkSecurityRule {
    pub name: String,
    pub update: NetworkSecurityRuleUpdate,
}

impl Mutation<ManagedCluster> for UpdateNetworkSecurityRule {
    fn describe(&self) -> String {
        format!("Update network security rule '{}'", self.name)
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        if let Some(priority) = self.update.priority {
            validate_priority(priority)?;
        }

        let Some(rule) = cluster
            .network_security_rules
            .iter_mut()
            .find(|rule| same_name(&rule.name, &self.name))
        else {
            return Err(rule_not_found(cluster, &self.name));
        };

        let update = &self.update;
        if let Some(description) = &update.description {
            rule.description = Some(description.clone());
        }
        if let Some(protocol) = update.protocol {
            rule.protocol = protocol;
        }
        if let Some(access) = update.access {
            rule.access = access;
        }
        if let Some(direction) = update.direction {
            rule.direction = direction;
        }
        if let Some(priority) = update.priority {
            rule.priority = priority;
        }
        if let Some(prefixes) = &update.source_address_prefixes {
            rule.source_address_prefixes = prefixes.clone();
        }
        if let Some(prefixes) = &update.destination_address_prefixes {
            rule.destination_address_prefixes = prefixes.clone();
        }
        if let Some(ranges) = &update.source_port_ranges {
            rule.source_port_ranges = ranges.clone();
        }
        if let Some(ranges) = &update.destination_port_ranges {
            rule.destination_port_ranges = ranges.clone();
        }
        Ok(())
    }
}
