use sfmc_core::{
    ClientCertificate, CollectionRef, ManagedCluster, NetworkSecurityRule, ResourceIdentity,
};

use crate::client::ArmClient;
use crate::error::Result;
use crate::mutations::{
    AddClientCertificate, AddNetworkSecurityRule, CertificateSelector, NetworkSecurityRuleUpdate,
    RemoveClientCertificate, RemoveNetworkSecurityRule, UpdateCluster, UpdateNetworkSecurityRule,
    find_rule,
};
use crate::options::NewClusterOptions;
use crate::outcome::{Outcome, SoftFailure};
use crate::provider::ResourceProvider;

impl<P: ResourceProvider> ArmClient<P> {
    // ========== Clusters ==========

    /// Create a managed cluster; an existing one is a soft failure
    pub async fn new_cluster(
        &self,
        identity: &ResourceIdentity,
        options: &NewClusterOptions,
    ) -> Result<Outcome<ManagedCluster>> {
        self.create_if_absent(identity, true, || options.build(identity))
            .await
    }

    pub async fn get_cluster(&self, identity: &ResourceIdentity) -> Result<Outcome<ManagedCluster>> {
        match self.get_optional(identity).await? {
            Some(cluster) => Ok(Outcome::Ok(cluster)),
            None => {
                let failure = SoftFailure::does_not_exist(identity);
                tracing::warn!(category = %failure.category, "{}", failure);
                Ok(Outcome::soft(failure))
            }
        }
    }

    /// List the clusters of a resource group
    pub async fn list_clusters(&self, resource_group: &str) -> Result<Vec<ManagedCluster>> {
        self.list_all(&CollectionRef::clusters(self.subscription_id(), resource_group))
            .await
    }

    pub async fn update_cluster(
        &self,
        identity: &ResourceIdentity,
        update: &UpdateCluster,
    ) -> Result<Outcome<ManagedCluster>> {
        self.apply_mutation(identity, update).await
    }

    // ========== Client certificates ==========

    pub async fn add_client_certificate(
        &self,
        identity: &ResourceIdentity,
        certificate: ClientCertificate,
    ) -> Result<Outcome<ManagedCluster>> {
        self.apply_mutation(identity, &AddClientCertificate { certificate })
            .await
    }

    pub async fn remove_client_certificate(
        &self,
        identity: &ResourceIdentity,
        selector: CertificateSelector,
    ) -> Result<Outcome<ManagedCluster>> {
        self.apply_mutation(identity, &RemoveClientCertificate { selector })
            .await
    }

    // ========== Network security rules ==========

    pub async fn add_network_security_rule(
        &self,
        identity: &ResourceIdentity,
        rule: NetworkSecurityRule,
    ) -> Result<Outcome<ManagedCluster>> {
        self.apply_mutation(identity, &AddNetworkSecurityRule { rule })
            .await
    }

    pub async fn update_network_security_rule(
        &self,
        identity: &ResourceIdentity,
        name: &str,
        update: NetworkSecurityRuleUpdate,
    ) -> Result<Outcome<ManagedCluster>> {
        let mutation = UpdateNetworkSecurityRule {
            name: name.to_string(),
            update,
        };
        self.apply_mutation(identity, &mutation).await
    }

    pub async fn remove_network_security_rule(
        &self,
        identity: &ResourceIdentity,
        name: &str,
    ) -> Result<Outcome<ManagedCluster>> {
        let mutation = RemoveNetworkSecurityRule {
            name: name.to_string(),
        };
        self.apply_mutation(identity, &mutation).await
    }

    /// Rules of a cluster, or the single rule called `name`
    pub async fn get_network_security_rules(
        &self,
        identity: &ResourceIdentity,
        name: Option<&str>,
    ) -> Result<Outcome<Vec<NetworkSecurityRule>>> {
        let cluster = match self.get_cluster(identity).await? {
            Outcome::Ok(cluster) => cluster,
            other => return Ok(other.map(|c| c.network_security_rules)),
        };

        match name {
            Some(name) => Ok(Outcome::Ok(vec![find_rule(&cluster, name)?.clone()])),
            None => Ok(Outcome::Ok(cluster.network_security_rules)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArmError;
    use crate::outcome::ErrorCategory;
    use crate::provider::MockProvider;
    use sfmc_core::{Access, ArmResource, Direction, NsgProtocol};

    const SUB: &str = "00000000-0000-0000-0000-000000000001";

    fn rule(name: &str, priority: i32) -> NetworkSecurityRule {
        NetworkSecurityRule {
            name: name.to_string(),
            description: None,
            protocol: NsgProtocol::Tcp,
            access: Access::Allow,
            direction: Direction::Inbound,
            priority,
            source_address_prefixes: vec!["*".into()],
            destination_address_prefixes: vec!["*".into()],
            source_port_ranges: vec!["*".into()],
            destination_port_ranges: vec!["443".into()],
        }
    }

    async fn setup() -> (ArmClient<MockProvider>, ResourceIdentity) {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "c1");
        let outcome = client
            .new_cluster(&cluster, &NewClusterOptions::new("eastus", "P@ssw0rd"))
            .await
            .unwrap();
        assert!(outcome.is_ok());
        client.provider().reset_counts();
        (client, cluster)
    }

    #[tokio::test]
    async fn test_new_cluster_twice_is_soft_failure() {
        let (client, cluster) = setup().await;

        let outcome = client
            .new_cluster(&cluster, &NewClusterOptions::new("westus", "P@ssw0rd"))
            .await
            .unwrap();

        assert_eq!(
            outcome.soft_failure().unwrap().category,
            ErrorCategory::ResourceAlreadyExists
        );
        assert_eq!(outcome.value().unwrap().location, "eastus");
        assert_eq!(client.provider().operation_counts().puts(), 0);
    }

    #[tokio::test]
    async fn test_admin_password_is_not_stored() {
        let (client, cluster) = setup().await;

        let Outcome::Ok(fetched) = client.get_cluster(&cluster).await.unwrap() else {
            panic!("cluster should exist");
        };
        assert!(fetched.admin_password.is_none());
        assert_eq!(fetched.identity().unwrap(), cluster);
    }

    #[tokio::test]
    async fn test_remove_missing_rule_leaves_cluster_unchanged() {
        let (client, cluster) = setup().await;
        client
            .add_network_security_rule(&cluster, rule("rule-Y", 1000))
            .await
            .unwrap();

        let err = client
            .remove_network_security_rule(&cluster, "rule-X")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));

        let Outcome::Ok(rules) = client.get_network_security_rules(&cluster, None).await.unwrap() else {
            panic!("cluster should exist");
        };
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "rule-Y");
    }

    #[tokio::test]
    async fn test_rule_lookup_is_case_insensitive() {
        let (client, cluster) = setup().await;
        client
            .add_network_security_rule(&cluster, rule("WebRule", 1100))
            .await
            .unwrap();

        let Outcome::Ok(found) = client
            .get_network_security_rules(&cluster, Some("webrule"))
            .await
            .unwrap()
        else {
            panic!("cluster should exist");
        };
        assert_eq!(found[0].name, "WebRule");

        let Outcome::Ok(updated) = client
            .remove_network_security_rule(&cluster, "webrule")
            .await
            .unwrap()
        else {
            panic!("cluster should exist");
        };
        assert!(updated.network_security_rules.is_empty());
    }

    #[tokio::test]
    async fn test_update_rule_keeps_other_fields() {
        let (client, cluster) = setup().await;
        client
            .add_network_security_rule(&cluster, rule("web", 1100))
            .await
            .unwrap();

        let update = NetworkSecurityRuleUpdate {
            priority: Some(1200),
            ..Default::default()
        };
        let Outcome::Ok(updated) = client
            .update_network_security_rule(&cluster, "WEB", update)
            .await
            .unwrap()
        else {
            panic!("cluster should exist");
        };

        let stored = &updated.network_security_rules[0];
        assert_eq!(stored.priority, 1200);
        assert_eq!(stored.destination_port_ranges, vec!["443".to_string()]);
    }

    #[tokio::test]
    async fn test_add_then_remove_certificate_restores_clients() {
        let (client, cluster) = setup().await;
        let Outcome::Ok(before) = client.get_cluster(&cluster).await.unwrap() else {
            panic!("cluster should exist");
        };

        client
            .add_client_certificate(&cluster, ClientCertificate::by_thumbprint("AA11", true))
            .await
            .unwrap();
        let Outcome::Ok(after) = client
            .remove_client_certificate(&cluster, CertificateSelector::Thumbprint("AA11".into()))
            .await
            .unwrap()
        else {
            panic!("cluster should exist");
        };

        assert_eq!(after.clients, before.clients);
    }

    #[tokio::test]
    async fn test_remove_certificate_from_empty_cluster() {
        let (client, cluster) = setup().await;

        let err = client
            .remove_client_certificate(&cluster, CertificateSelector::Thumbprint("AA11".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::InvalidOperation { .. }));
        assert_eq!(client.provider().operation_counts().puts(), 0);
    }

    #[tokio::test]
    async fn test_mutation_on_missing_cluster() {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "ghost");

        let outcome = client
            .add_client_certificate(&cluster, ClientCertificate::by_thumbprint("AA11", false))
            .await
            .unwrap();

        assert_eq!(
            outcome.soft_failure().unwrap().category,
            ErrorCategory::ResourceDoesNotExist
        );
    }

    #[tokio::test]
    async fn test_get_missing_cluster_names_cluster() {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "ghost");

        let outcome = client.get_cluster(&cluster).await.unwrap();

        let failure = outcome.soft_failure().unwrap();
        assert_eq!(failure.message, "Managed cluster 'ghost' does not exist.");
        assert_eq!(failure.target, cluster.resource_id());
    }

    #[tokio::test]
    async fn test_remote_error_on_rule_removal() {
        let (client, cluster) = setup().await;
        client.provider().fail_next(&cluster, "throttled");

        let err = client
            .remove_network_security_rule(&cluster, "x")
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::Remote(ref m) if m == "throttled"));
        assert_eq!(client.provider().operation_counts().puts(), 0);
    }

    #[tokio::test]
    async fn test_list_clusters() {
        let (client, _) = setup().await;
        let other = ResourceIdentity::cluster(SUB, "rg1", "c2");
        client
            .new_cluster(&other, &NewClusterOptions::new("eastus", "pw"))
            .await
            .unwrap();

        let clusters = client.list_clusters("rg1").await.unwrap();
        assert_eq!(clusters.len(), 2);
        assert!(client.list_clusters("rg2").await.unwrap().is_empty());
    }
}
