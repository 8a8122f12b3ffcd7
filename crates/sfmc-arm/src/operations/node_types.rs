use sfmc_core::{NodeType, ResourceIdentity, ResourceKind, VmExtension};

use crate::client::ArmClient;
use crate::error::Result;
use crate::mutations::{AddVmExtension, UpdateVmExtension};
use crate::options::NewNodeTypeOptions;
use crate::outcome::Outcome;
use crate::provider::ResourceProvider;

impl<P: ResourceProvider> ArmClient<P> {
    // ========== Node types ==========

    /// Create a node type in an existing cluster
    pub async fn new_node_type(
        &self,
        identity: &ResourceIdentity,
        options: &NewNodeTypeOptions,
    ) -> Result<Outcome<NodeType>> {
        if !self.exists(&identity.cluster_identity()).await? {
            return Ok(self.missing_cluster(identity));
        }

        self.create_if_absent(identity, true, || options.build(identity))
            .await
    }

    pub async fn get_node_type(&self, identity: &ResourceIdentity) -> Result<Outcome<NodeType>> {
        self.get_or_soft(identity).await
    }

    /// List the node types of a cluster
    pub async fn list_node_types(&self, cluster: &ResourceIdentity) -> Result<Outcome<Vec<NodeType>>> {
        self.list_children(cluster, ResourceKind::NodeType).await
    }

    // ========== VM extensions ==========

    pub async fn add_vm_extension(
        &self,
        identity: &ResourceIdentity,
        extension: VmExtension,
    ) -> Result<Outcome<NodeType>> {
        self.apply_mutation(identity, &AddVmExtension { extension })
            .await
    }

    pub async fn update_vm_extension(
        &self,
        identity: &ResourceIdentity,
        update: &UpdateVmExtension,
    ) -> Result<Outcome<NodeType>> {
        self.apply_mutation(identity, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NewClusterOptions;
    use crate::outcome::ErrorCategory;
    use crate::provider::MockProvider;

    const SUB: &str = "00000000-0000-0000-0000-000000000001";

    async fn setup() -> (ArmClient<MockProvider>, ResourceIdentity) {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "c1");
        client
            .new_cluster(&cluster, &NewClusterOptions::new("eastus", "pw"))
            .await
            .unwrap();
        (client, cluster)
    }

    fn bginfo() -> VmExtension {
        VmExtension {
            name: "BGInfo".into(),
            publisher: "Microsoft.Compute".into(),
            extension_type: "BGInfo".into(),
            type_handler_version: "2.1".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_node_type_in_missing_cluster() {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let identity =
            ResourceIdentity::cluster(SUB, "rg1", "ghost").child(ResourceKind::NodeType, "nt1");

        let outcome = client
            .new_node_type(&identity, &NewNodeTypeOptions::new(5).primary())
            .await
            .unwrap();

        let failure = outcome.soft_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::ResourceDoesNotExist);
        assert_eq!(failure.message, "Parent cluster 'ghost' does not exist.");
        assert_eq!(client.provider().resource_count(), 0);
    }

    #[tokio::test]
    async fn test_create_and_list_node_types() {
        let (client, cluster) = setup().await;
        for name in ["nt1", "nt2"] {
            let identity = cluster.child(ResourceKind::NodeType, name);
            let outcome = client
                .new_node_type(&identity, &NewNodeTypeOptions::new(3))
                .await
                .unwrap();
            assert!(outcome.is_ok());
        }

        let Outcome::Ok(node_types) = client.list_node_types(&cluster).await.unwrap() else {
            panic!("cluster should exist");
        };
        let names: Vec<_> = node_types.iter().map(|nt| nt.name.as_str()).collect();
        assert_eq!(names, vec!["nt1", "nt2"]);
    }

    #[tokio::test]
    async fn test_extension_add_then_update() {
        let (client, cluster) = setup().await;
        let identity = cluster.child(ResourceKind::NodeType, "nt1");
        client
            .new_node_type(&identity, &NewNodeTypeOptions::new(5).primary())
            .await
            .unwrap();

        client.add_vm_extension(&identity, bginfo()).await.unwrap();
        let update = UpdateVmExtension {
            name: "bginfo".into(),
            type_handler_version: Some("2.2".into()),
            ..Default::default()
        };
        let Outcome::Ok(node_type) = client.update_vm_extension(&identity, &update).await.unwrap()
        else {
            panic!("node type should exist");
        };

        assert_eq!(node_type.vm_extensions.len(), 1);
        assert_eq!(node_type.vm_extensions[0].type_handler_version, "2.2");
        assert_eq!(node_type.vm_extensions[0].publisher, "Microsoft.Compute");
    }

    #[tokio::test]
    async fn test_extension_on_missing_node_type() {
        let (client, cluster) = setup().await;
        let identity = cluster.child(ResourceKind::NodeType, "nt9");

        let outcome = client.add_vm_extension(&identity, bginfo()).await.unwrap();

        assert_eq!(
            outcome.soft_failure().unwrap().message,
            "Managed node type 'nt9' does not exist."
        );
    }
}
