use sfmc_core::{ResourceIdentity, ResourceKind, Service};

use crate::client::ArmClient;
use crate::error::{ArmError, Result};
use crate::options::ServiceOptions;
use crate::outcome::{Outcome, SoftFailure};
use crate::provider::ResourceProvider;

impl<P: ResourceProvider> ArmClient<P> {
    // ========== Services ==========

    /// Create a service under an existing application
    pub async fn new_service(
        &self,
        identity: &ResourceIdentity,
        options: &ServiceOptions,
    ) -> Result<Outcome<Service>> {
        options.validate()?;
        let Some(cluster) = self.parent_cluster(identity).await? else {
            return Ok(self.missing_cluster(identity));
        };

        let application = identity
            .parent()
            .ok_or_else(|| ArmError::invalid_argument("Service needs an application name"))?;
        if !self.exists(&application).await? {
            let failure = SoftFailure::does_not_exist(&application);
            tracing::warn!(category = %failure.category, "{}", failure);
            return Ok(Outcome::soft(failure));
        }

        self.create_if_absent(identity, true, || options.build(identity, &cluster.location))
            .await
    }

    pub async fn get_service(&self, identity: &ResourceIdentity) -> Result<Outcome<Service>> {
        self.get_or_soft(identity).await
    }

    /// List the services of an application
    pub async fn list_services(&self, application: &ResourceIdentity) -> Result<Outcome<Vec<Service>>> {
        self.list_children(application, ResourceKind::Service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ApplicationOptions, NewClusterOptions};
    use crate::outcome::ErrorCategory;
    use crate::provider::MockProvider;
    use sfmc_core::{Partition, ServiceKind};

    const SUB: &str = "00000000-0000-0000-0000-000000000001";

    async fn setup() -> (ArmClient<MockProvider>, ResourceIdentity) {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "c1");
        client
            .new_cluster(&cluster, &NewClusterOptions::new("eastus", "pw"))
            .await
            .unwrap();
        let app = cluster.child(ResourceKind::Application, "voting");
        client
            .new_application(&app, &ApplicationOptions::new("VotingType", "1.0.0"))
            .await
            .unwrap();
        (client, app)
    }

    #[tokio::test]
    async fn test_new_stateful_service() {
        let (client, app) = setup().await;
        let identity = app.child(ResourceKind::Service, "data");
        let options = ServiceOptions::new(
            "DataType",
            ServiceKind::Stateful {
                target_replica_set_size: Some(3),
                min_replica_set_size: Some(2),
                has_persisted_state: true,
                replica_restart_wait_duration: None,
                quorum_loss_wait_duration: None,
                stand_by_replica_keep_duration: None,
                service_placement_time_limit: None,
            },
        )
        .with_partition(Partition::UniformInt64Range {
            count: 4,
            low_key: 0,
            high_key: 1023,
        });

        let Outcome::Ok(service) = client.new_service(&identity, &options).await.unwrap() else {
            panic!("expected a new service");
        };

        assert_eq!(service.location, "eastus");
        assert!(service.properties.kind.is_stateful());

        let Outcome::Ok(services) = client.list_services(&app).await.unwrap() else {
            panic!("cluster should exist");
        };
        assert_eq!(services.len(), 1);
    }

    #[tokio::test]
    async fn test_service_in_missing_application() {
        let (client, app) = setup().await;
        let missing = app
            .cluster_identity()
            .child(ResourceKind::Application, "ghost")
            .child(ResourceKind::Service, "web");

        let outcome = client
            .new_service(&missing, &ServiceOptions::stateless("WebType", -1))
            .await
            .unwrap();

        let failure = outcome.soft_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::ResourceDoesNotExist);
        assert_eq!(failure.message, "Managed application 'ghost' does not exist.");
    }

    #[tokio::test]
    async fn test_invalid_service_options_fail_before_remote_calls() {
        let (client, app) = setup().await;
        client.provider().reset_counts();

        let err = client
            .new_service(
                &app.child(ResourceKind::Service, "web"),
                &ServiceOptions::stateless("WebType", 0),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::InvalidArgument { .. }));
        assert_eq!(client.provider().operation_counts().gets, 0);
    }
}
