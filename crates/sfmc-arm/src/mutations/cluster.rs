//! Cluster field updates

use sfmc_core::{ManagedCluster, Tags, UpgradeMode};

use super::Mutation;
use crate::error::{ArmError, Result};

/// Overwrite top-level cluster fields; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateCluster {
    pub dns_name: Option<String>,
    pub client_connection_port: Option<i32>,
    pub http_gateway_connection_port: Option<i32>,
    pub upgrade_mode: Option<UpgradeMode>,
    pub code_version: Option<String>,
    /// Replaces all tags when set
    pub tags: Option<Tags>,
}

impl UpdateCluster {
    fn validate(&self, cluster: &ManagedCluster) -> Result<()> {
        if self.upgrade_mode == Some(UpgradeMode::Manual) {
            return Err(ArmError::invalid_argument(
                "Currently only upgrade mode Automatic is supported",
            ));
        }
        if self.code_version.is_some() && cluster.upgrade_mode() == UpgradeMode::Automatic {
            return Err(ArmError::invalid_argument(
                "Currently the cluster upgrade mode is set to Automatic and CodeVersion should only be used when upgrade mode is set to Manual",
            ));
        }
        for port in [self.client_connection_port, self.http_gateway_connection_port]
            .into_iter()
            .flatten()
        {
            if !(1..=65535).contains(&port) {
                return Err(ArmError::invalid_argument(format!("Invalid port {}", port)));
            }
        }
        Ok(())
    }
}

impl Mutation<ManagedCluster> for UpdateCluster {
    fn describe(&self) -> String {
        let mut fields = Vec::new();
        if self.dns_name.is_some() {
            fields.push("dnsName");
        }
        if self.client_connection_port.is_some() {
            fields.push("clientConnectionPort");
        }
        if self.http_gateway_connection_port.is_some() {
            fields.push("httpGatewayConnectionPort");
        }
        if self.upgrade_mode.is_some() {
            fields.push("clusterUpgradeMode");
        }
        if self.code_version.is_some() {
            fields.push("clusterCodeVersion");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        format!("Update cluster fields: {}", fields.join(", "))
    }

    fn apply(&self, cluster: &mut ManagedCluster) -> Result<()> {
        self.validate(cluster)?;

        if let Some(dns_name) = self.dns_name.as_deref().filter(|d| !d.is_empty()) {
            cluster.dns_name = Some(dns_name.to_string());
        }
        if let Some(port) = self.client_connection_port {
            cluster.client_connection_port = Some(port);
        }
        if let Some(port) = self.http_gateway_connection_port {
            cluster.http_gateway_connection_port = Some(port);
        }
        if let Some(mode) = self.upgrade_mode {
            cluster.cluster_upgrade_mode = Some(mode);
        }
        if let Some(version) = &self.code_version {
            cluster.cluster_code_version = Some(version.clone());
        }
        if let Some(tags) = &self.tags {
            cluster.tags = tags.clone();
        }
        Ok(())
    }
}
