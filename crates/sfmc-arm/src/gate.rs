//! Existence and fetch gating
//!
//! Two policies wrap every mutating call:
//! - **Create**: check existence first; an existing resource is returned
//!   untouched, with a soft `ResourceAlreadyExists` when the caller asked
//!   for one.
//! - **Mutate**: always fetch the current representation, apply one
//!   mutation to a copy and resubmit the whole document. A missing target
//!   is a soft `ResourceDoesNotExist`.
//!
//! Fetch-mutate-put is last-write-wins: two invocations racing on the
//! same resource may lose one of the updates.

use sfmc_core::{ArmResource, ManagedCluster, ResourceIdentity, ResourceKind};

use crate::client::ArmClient;
use crate::error::Result;
use crate::mutations::Mutation;
use crate::outcome::{Outcome, SoftFailure};
use crate::provider::ResourceProvider;

impl<P: ResourceProvider> ArmClient<P> {
    /// Fetch the cluster owning `identity`, `None` if it does not exist
    pub async fn parent_cluster(&self, identity: &ResourceIdentity) -> Result<Option<ManagedCluster>> {
        self.get_optional(&identity.cluster_identity()).await
    }

    /// Soft failure for a missing owning cluster
    pub(crate) fn missing_cluster<T>(&self, identity: &ResourceIdentity) -> Outcome<T> {
        let failure = SoftFailure::parent_does_not_exist(identity);
        tracing::warn!(category = %failure.category, "{}", failure);
        Outcome::soft(failure)
    }

    /// Create a resource unless it already exists
    ///
    /// `build` runs only when the resource is absent.
    pub async fn create_if_absent<T, F>(
        &self,
        identity: &ResourceIdentity,
        error_if_present: bool,
        build: F,
    ) -> Result<Outcome<T>>
    where
        T: ArmResource,
        F: FnOnce() -> Result<T>,
    {
        if self.exists(identity).await? {
            let existing: T = self.get(identity).await?;
            if error_if_present {
                let failure = SoftFailure::already_exists(identity);
                tracing::warn!(category = %failure.category, "{}", failure);
                return Ok(Outcome::soft_with(failure, existing));
            }
            tracing::debug!("{} '{}' already exists, reusing it", T::KIND, identity.name);
            return Ok(Outcome::Ok(existing));
        }

        let resource = build()?;
        tracing::debug!("creating {} '{}'", T::KIND, identity.name);
        let created = self.create_or_update(identity, &resource).await?;
        tracing::info!("created {} '{}'", T::KIND, identity.name);
        Ok(Outcome::Ok(created))
    }

    /// Fetch, apply one mutation and resubmit
    ///
    /// The result is the representation returned by the provider, not the
    /// local copy.
    pub async fn apply_mutation<T, M>(
        &self,
        identity: &ResourceIdentity,
        mutation: &M,
    ) -> Result<Outcome<T>>
    where
        T: ArmResource,
        M: Mutation<T> + ?Sized,
    {
        let Some(current) = self.get_optional::<T>(identity).await? else {
            let failure = self.missing_target(identity).await?;
            tracing::warn!(category = %failure.category, "{}", failure);
            return Ok(Outcome::soft(failure));
        };

        let description = mutation.describe();
        tracing::debug!(id = %identity, "{}", description);

        let mut updated = current;
        mutation.apply(&mut updated)?;

        let stored = self.create_or_update(identity, &updated).await?;
        tracing::info!("{} on {} '{}'", description, T::KIND, identity.name);
        Ok(Outcome::Ok(stored))
    }

    /// Fetch a resource; a missing one is a soft failure
    pub(crate) async fn get_or_soft<T: ArmResource>(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Outcome<T>> {
        if let Some(resource) = self.get_optional(identity).await? {
            return Ok(Outcome::Ok(resource));
        }
        let failure = self.missing_target(identity).await?;
        tracing::warn!(category = %failure.category, "{}", failure);
        Ok(Outcome::soft(failure))
    }

    /// Record for a target that was not found: its cluster if that is gone too
    async fn missing_target(&self, identity: &ResourceIdentity) -> Result<SoftFailure> {
        if identity.kind != ResourceKind::ManagedCluster
            && !self.exists(&identity.cluster_identity()).await?
        {
            return Ok(SoftFailure::parent_does_not_exist(identity));
        }
        Ok(SoftFailure::does_not_exist(identity))
    }

    /// List the `kind` children of `parent`; a missing cluster is a soft failure
    pub(crate) async fn list_children<T: ArmResource>(
        &self,
        parent: &ResourceIdentity,
        kind: ResourceKind,
    ) -> Result<Outcome<Vec<T>>> {
        if !self.exists(&parent.cluster_identity()).await? {
            return Ok(self.missing_cluster(parent));
        }
        let resources = self.list_all(&parent.children(kind)).await?;
        Ok(Outcome::Ok(resources))
    }
}
