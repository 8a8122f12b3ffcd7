use sfmc_core::{
    Application, ApplicationType, ApplicationTypeVersion, ArmResource, ManagedCluster,
    ResourceIdentity, ResourceKind, Tags,
};

use crate::client::ArmClient;
use crate::confirm::confirm_action;
use crate::error::{ArmError, Result};
use crate::mutations::TagMutation;
use crate::options::{ApplicationOptions, ApplicationTypeVersionOptions};
use crate::outcome::{Outcome, SoftFailure};
use crate::provider::ResourceProvider;

const RECREATE_CAPTION: &str = "Recreating managed application type version.";

impl<P: ResourceProvider> ArmClient<P> {
    // ========== Application types ==========

    /// Create an application type; an existing one is a soft failure
    pub async fn new_application_type(
        &self,
        identity: &ResourceIdentity,
        tags: &Tags,
    ) -> Result<Outcome<ApplicationType>> {
        let Some(cluster) = self.parent_cluster(identity).await? else {
            return Ok(self.missing_cluster(identity));
        };
        self.ensure_application_type(identity, &cluster, tags, true)
            .await
    }

    pub async fn get_application_type(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Outcome<ApplicationType>> {
        self.get_or_soft(identity).await
    }

    pub async fn list_application_types(
        &self,
        cluster: &ResourceIdentity,
    ) -> Result<Outcome<Vec<ApplicationType>>> {
        self.list_children(cluster, ResourceKind::ApplicationType)
            .await
    }

    pub async fn update_application_type(
        &self,
        identity: &ResourceIdentity,
        tags: &TagMutation,
    ) -> Result<Outcome<ApplicationType>> {
        self.apply_mutation(identity, tags).await
    }

    async fn ensure_application_type(
        &self,
        identity: &ResourceIdentity,
        cluster: &ManagedCluster,
        tags: &Tags,
        error_if_present: bool,
    ) -> Result<Outcome<ApplicationType>> {
        self.create_if_absent(identity, error_if_present, || {
            let mut app_type = ApplicationType::new(identity, &cluster.location);
            app_type.tags = tags.clone();
            Ok(app_type)
        })
        .await
    }

    // ========== Application type versions ==========

    /// Provision an application type version, creating its type on demand
    ///
    /// A version left in `Failed` state is recreated once after
    /// confirmation (`force` skips the question). A version still `Failed`
    /// afterwards is a [`ArmError::ProvisioningFailed`].
    pub async fn new_application_type_version(
        &self,
        identity: &ResourceIdentity,
        options: &ApplicationTypeVersionOptions,
    ) -> Result<Outcome<ApplicationTypeVersion>> {
        let Some(cluster) = self.parent_cluster(identity).await? else {
            return Ok(self.missing_cluster(identity));
        };
        self.provision_type_version(identity, &cluster, options, true)
            .await
    }

    pub async fn get_application_type_version(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Outcome<ApplicationTypeVersion>> {
        self.get_or_soft(identity).await
    }

    async fn provision_type_version(
        &self,
        identity: &ResourceIdentity,
        cluster: &ManagedCluster,
        options: &ApplicationTypeVersionOptions,
        error_if_present: bool,
    ) -> Result<Outcome<ApplicationTypeVersion>> {
        options.validate()?;

        let type_identity = identity
            .parent()
            .ok_or_else(|| ArmError::invalid_argument("Application type version needs a type name"))?;
        self.ensure_application_type(&type_identity, cluster, &Tags::new(), false)
            .await?
            .into_result()?;

        let label = format!(
            "{}:{}",
            identity.parent_name.as_deref().unwrap_or_default(),
            identity.name
        );

        let version = match self.get_optional::<ApplicationTypeVersion>(identity).await? {
            Some(existing) if existing.is_failed() => {
                tracing::debug!("Managed application type version '{}' already exists", label);
                let resource = format!("Managed ApplicationTypeVersion {}", label);
                let query = format!(
                    "{} already exists but provisioning is in Failed state. Do you want to recreate the resource?",
                    resource
                );
                if !confirm_action(self.confirm(), options.force, &query, RECREATE_CAPTION, &resource) {
                    let failure = SoftFailure::already_exists(identity);
                    tracing::warn!(category = %failure.category, "{}", failure);
                    return Ok(Outcome::soft_with(failure, existing));
                }
                self.create_type_version(identity, cluster, options, &label).await?
            }
            Some(existing) if error_if_present => {
                let failure = SoftFailure::already_exists(identity);
                tracing::warn!(category = %failure.category, "{}", failure);
                return Ok(Outcome::soft_with(failure, existing));
            }
            Some(existing) => existing,
            None => self.create_type_version(identity, cluster, options, &label).await?,
        };

        if let Some(state) = version.provisioning_state().filter(|s| s.is_failed()) {
            return Err(ArmError::ProvisioningFailed {
                kind: ResourceKind::ApplicationTypeVersion,
                name: label,
                state,
            });
        }
        Ok(Outcome::Ok(version))
    }

    async fn create_type_version(
        &self,
        identity: &ResourceIdentity,
        cluster: &ManagedCluster,
        options: &ApplicationTypeVersionOptions,
        label: &str,
    ) -> Result<ApplicationTypeVersion> {
        tracing::debug!("creating managed application type version '{}'", label);
        let version = options.build(identity, &cluster.location)?;
        let created = self.create_or_update(identity, &version).await?;
        tracing::info!("created application type version '{}'", label);
        Ok(created)
    }

    // ========== Applications ==========

    /// Create an application, provisioning its type version first when a
    /// package URL is given
    pub async fn new_application(
        &self,
        identity: &ResourceIdentity,
        options: &ApplicationOptions,
    ) -> Result<Outcome<Application>> {
        options.validate()?;
        let Some(cluster) = self.parent_cluster(identity).await? else {
            return Ok(self.missing_cluster(identity));
        };

        if let Some(package_url) = &options.package_url {
            let version_options = ApplicationTypeVersionOptions {
                package_url: package_url.clone(),
                tags: Tags::new(),
                force: options.force,
            };
            self.provision_type_version(
                &options.version_identity(identity),
                &cluster,
                &version_options,
                false,
            )
            .await?
            .into_result()?;
        }

        self.create_if_absent(identity, true, || options.build(identity, &cluster.location))
            .await
    }

    pub async fn get_application(&self, identity: &ResourceIdentity) -> Result<Outcome<Application>> {
        self.get_or_soft(identity).await
    }

    pub async fn list_applications(
        &self,
        cluster: &ResourceIdentity,
    ) -> Result<Outcome<Vec<Application>>> {
        self.list_children(cluster, ResourceKind::Application).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Decline;
    use crate::options::NewClusterOptions;
    use crate::outcome::ErrorCategory;
    use crate::provider::MockProvider;
    use sfmc_core::{ProvisioningState, parse_tags};

    const SUB: &str = "00000000-0000-0000-0000-000000000001";
    const PACKAGE: &str = "https://store.blob.core.windows.net/apps/voting.sfpkg";

    async fn setup(provider: &MockProvider) -> ResourceIdentity {
        let client = ArmClient::new(provider.clone(), SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "c1");
        client
            .new_cluster(&cluster, &NewClusterOptions::new("eastus", "pw"))
            .await
            .unwrap();
        cluster
    }

    fn version_identity(cluster: &ResourceIdentity) -> ResourceIdentity {
        cluster
            .child(ResourceKind::ApplicationType, "VotingType")
            .child(ResourceKind::ApplicationTypeVersion, "1.0.0")
    }

    /// Provision a version that ends in `Failed` state, then reset counters
    async fn failed_version(provider: &MockProvider, cluster: &ResourceIdentity) -> ResourceIdentity {
        let identity = version_identity(cluster);
        provider.script_provisioning(&identity, ProvisioningState::Failed);

        let client = ArmClient::new(provider.clone(), SUB);
        let err = client
            .new_application_type_version(&identity, &ApplicationTypeVersionOptions::new(PACKAGE))
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::ProvisioningFailed { .. }));

        provider.reset_counts();
        identity
    }

    #[tokio::test]
    async fn test_version_creates_type_on_demand() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let client = ArmClient::new(provider.clone(), SUB);
        let identity = version_identity(&cluster);

        let outcome = client
            .new_application_type_version(&identity, &ApplicationTypeVersionOptions::new(PACKAGE))
            .await
            .unwrap();

        let Outcome::Ok(version) = outcome else {
            panic!("expected a new version");
        };
        assert_eq!(version.location, "eastus");
        assert_eq!(version.app_package_url.as_deref(), Some(PACKAGE));
        assert!(provider.document(&identity.parent().unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_failed_version_with_force_is_recreated_once() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let identity = failed_version(&provider, &cluster).await;
        let client = ArmClient::new(provider.clone(), SUB).with_confirm(Decline);

        let outcome = client
            .new_application_type_version(
                &identity,
                &ApplicationTypeVersionOptions::new(PACKAGE).with_force(),
            )
            .await
            .unwrap();

        let Outcome::Ok(version) = outcome else {
            panic!("expected a recreated version");
        };
        assert_eq!(version.provisioning_state, Some(ProvisioningState::Succeeded));
        assert_eq!(provider.operation_counts().puts(), 1);
    }

    #[tokio::test]
    async fn test_failed_version_declined_is_soft_failure() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let identity = failed_version(&provider, &cluster).await;
        let client = ArmClient::new(provider.clone(), SUB).with_confirm(Decline);

        let outcome = client
            .new_application_type_version(&identity, &ApplicationTypeVersionOptions::new(PACKAGE))
            .await
            .unwrap();

        assert_eq!(
            outcome.soft_failure().unwrap().category,
            ErrorCategory::ResourceAlreadyExists
        );
        assert!(outcome.value().unwrap().is_failed());
        assert_eq!(provider.operation_counts().puts(), 0);
    }

    #[tokio::test]
    async fn test_version_still_failed_after_recreate() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let identity = failed_version(&provider, &cluster).await;
        provider.script_provisioning(&identity, ProvisioningState::Failed);
        let client = ArmClient::new(provider.clone(), SUB);

        let err = client
            .new_application_type_version(&identity, &ApplicationTypeVersionOptions::new(PACKAGE))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Managed application type version VotingType:1.0.0 is in provisioning state Failed"
        );
        assert_eq!(provider.operation_counts().puts(), 1);
    }

    #[tokio::test]
    async fn test_existing_version_is_soft_failure() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let client = ArmClient::new(provider.clone(), SUB);
        let identity = version_identity(&cluster);
        let options = ApplicationTypeVersionOptions::new(PACKAGE);
        client.new_application_type_version(&identity, &options).await.unwrap();

        let outcome = client.new_application_type_version(&identity, &options).await.unwrap();
        assert_eq!(
            outcome.soft_failure().unwrap().message,
            "Managed application type version 'VotingType:1.0.0' already exists."
        );
    }

    #[tokio::test]
    async fn test_new_application_with_package_url() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let client = ArmClient::new(provider.clone(), SUB);
        let identity = cluster.child(ResourceKind::Application, "voting");
        let options = ApplicationOptions::new("VotingType", "1.0.0").with_package_url(PACKAGE);

        let Outcome::Ok(app) = client.new_application(&identity, &options).await.unwrap() else {
            panic!("expected a new application");
        };

        let version = options.version_identity(&identity);
        assert_eq!(app.version, Some(version.resource_id()));
        assert!(provider.document(&version).is_some());

        let Outcome::Ok(apps) = client.list_applications(&cluster).await.unwrap() else {
            panic!("cluster should exist");
        };
        assert_eq!(apps.len(), 1);
    }

    #[tokio::test]
    async fn test_new_application_reuses_existing_version() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let client = ArmClient::new(provider.clone(), SUB);
        client
            .new_application_type_version(
                &version_identity(&cluster),
                &ApplicationTypeVersionOptions::new(PACKAGE),
            )
            .await
            .unwrap();
        provider.reset_counts();

        let identity = cluster.child(ResourceKind::Application, "voting");
        let options = ApplicationOptions::new("VotingType", "1.0.0").with_package_url(PACKAGE);
        let outcome = client.new_application(&identity, &options).await.unwrap();

        assert!(outcome.is_ok());
        assert_eq!(provider.operation_counts().puts(), 1);
    }

    #[tokio::test]
    async fn test_application_in_missing_cluster() {
        let provider = MockProvider::new();
        let client = ArmClient::new(provider.clone(), SUB);
        let identity =
            ResourceIdentity::cluster(SUB, "rg1", "ghost").child(ResourceKind::Application, "app");

        let outcome = client
            .new_application(&identity, &ApplicationOptions::new("T", "1.0"))
            .await
            .unwrap();

        assert_eq!(
            outcome.soft_failure().unwrap().category,
            ErrorCategory::ResourceDoesNotExist
        );
        assert_eq!(provider.resource_count(), 0);
    }

    #[tokio::test]
    async fn test_update_application_type_tags() {
        let provider = MockProvider::new();
        let cluster = setup(&provider).await;
        let client = ArmClient::new(provider.clone(), SUB);
        let identity = cluster.child(ResourceKind::ApplicationType, "VotingType");
        client
            .new_application_type(&identity, &parse_tags(["env=dev"]).unwrap())
            .await
            .unwrap();

        let merge = TagMutation::Merge(parse_tags(["owner=ops"]).unwrap());
        let Outcome::Ok(app_type) = client.update_application_type(&identity, &merge).await.unwrap()
        else {
            panic!("application type should exist");
        };

        assert_eq!(app_type.tags, parse_tags(["env=dev", "owner=ops"]).unwrap());
    }
}
