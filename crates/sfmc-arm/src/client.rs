//! High-level client for managed cluster resources
//!
//! `ArmClient` wraps a [`ResourceProvider`] with typed access to the
//! representations. The per-resource operations live in
//! [`crate::operations`] as further `impl` blocks.

use std::sync::Arc;

use futures::TryStreamExt;
use sfmc_core::{ArmResource, CollectionRef, IdentityArgs, ResourceIdentity, ResourceKind};

use crate::confirm::{AssumeYes, Confirm};
use crate::error::Result;
use crate::provider::{Document, ResourceProvider, from_document, to_document};

/// Listing state: `None` once drained, otherwise the continuation to request
type ListState = Option<Option<String>>;

/// High-level client for sfmc
pub struct ArmClient<P: ResourceProvider> {
    /// Collaborator
    provider: P,

    /// Subscription used by the by-name parameter set
    subscription_id: String,

    /// Confirmation hook for destructive actions
    confirm: Arc<dyn Confirm>,
}

impl<P: ResourceProvider> ArmClient<P> {
    /// Create a new client that approves every confirmation
    pub fn new(provider: P, subscription_id: impl Into<String>) -> Self {
        Self {
            provider,
            subscription_id: subscription_id.into(),
            confirm: Arc::new(AssumeYes),
        }
    }

    /// Use a different confirmation hook
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.set_confirm(confirm);
        self
    }

    pub fn set_confirm(&mut self, confirm: impl Confirm + 'static) {
        self.confirm = Arc::new(confirm);
    }

    /// Get the provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub(crate) fn confirm(&self) -> &dyn Confirm {
        self.confirm.as_ref()
    }

    /// Resolve a parameter set into an identity of `kind`
    pub fn resolve(&self, kind: ResourceKind, args: &IdentityArgs) -> Result<ResourceIdentity> {
        Ok(ResourceIdentity::resolve(kind, args, &self.subscription_id)?)
    }

    /// Check if a resource exists
    pub async fn exists(&self, identity: &ResourceIdentity) -> Result<bool> {
        tracing::debug!(id = %identity, "checking existence");
        self.provider
            .exists(identity)
            .await
            .inspect_err(|e| e.log_detail())
    }

    /// Fetch a typed representation
    pub async fn get<T: ArmResource>(&self, identity: &ResourceIdentity) -> Result<T> {
        debug_assert_eq!(identity.kind, T::KIND);
        tracing::debug!(id = %identity, "fetching {}", T::KIND);

        let document = self.provider.get(identity).await.inspect_err(|e| {
            if !e.is_not_found() {
                e.log_detail();
            }
        })?;
        from_document(document)
    }

    /// Fetch a typed representation, `None` if absent
    pub async fn get_optional<T: ArmResource>(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Option<T>> {
        match self.get(identity).await {
            Ok(resource) => Ok(Some(resource)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Submit the whole representation and return the authoritative result
    pub async fn create_or_update<T: ArmResource>(
        &self,
        identity: &ResourceIdentity,
        resource: &T,
    ) -> Result<T> {
        debug_assert_eq!(identity.kind, T::KIND);
        tracing::debug!(id = %identity, "submitting {}", T::KIND);

        let document = to_document(resource)?;
        let stored = self
            .provider
            .create_or_update(identity, document)
            .await
            .inspect_err(|e| e.log_detail())?;
        from_document(stored)
    }

    /// List every member of a collection, draining all pages
    pub async fn list_all<T: ArmResource>(&self, collection: &CollectionRef) -> Result<Vec<T>> {
        debug_assert_eq!(collection.kind, T::KIND);
        tracing::debug!(collection = %collection, "listing {}s", T::KIND);

        let pages = futures::stream::try_unfold(Some(None), move |state| {
            self.next_page(collection, state)
        });
        let documents: Vec<Document> = pages
            .try_concat()
            .await
            .inspect_err(|e| e.log_detail())?;

        documents.into_iter().map(from_document).collect()
    }

    async fn next_page(
        &self,
        collection: &CollectionRef,
        state: ListState,
    ) -> Result<Option<(Vec<Document>, ListState)>> {
        let Some(continuation) = state else {
            return Ok(None);
        };
        let page = self
            .provider
            .list_page(collection, continuation.as_deref())
            .await?;
        Ok(Some((page.items, page.next.map(Some))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use sfmc_core::{ManagedCluster, NodeType};

    const SUB: &str = "00000000-0000-0000-0000-000000000001";

    #[tokio::test]
    async fn test_create_then_fetch_matches_identity() {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let identity = client
            .resolve(ResourceKind::ManagedCluster, &IdentityArgs::by_name("rg1", "c1"))
            .unwrap();

        client
            .create_or_update(&identity, &ManagedCluster::new(&identity, "eastus"))
            .await
            .unwrap();
        let fetched: ManagedCluster = client.get(&identity).await.unwrap();

        let fetched_identity = fetched.identity().unwrap();
        assert_eq!(fetched_identity, identity);
        assert_eq!(fetched.location, "eastus");
    }

    #[tokio::test]
    async fn test_get_optional_absent() {
        let client = ArmClient::new(MockProvider::new(), SUB);
        let identity = ResourceIdentity::cluster(SUB, "rg1", "missing");

        let cluster: Option<ManagedCluster> = client.get_optional(&identity).await.unwrap();
        assert!(cluster.is_none());
    }

    #[tokio::test]
    async fn test_list_all_drains_pages() {
        let provider = MockProvider::new().with_page_size(2);
        let client = ArmClient::new(provider, SUB);
        let cluster = ResourceIdentity::cluster(SUB, "rg1", "c1");
        client
            .create_or_update(&cluster, &ManagedCluster::new(&cluster, "eastus"))
            .await
            .unwrap();
        for i in 0..5 {
            let identity = cluster.child(ResourceKind::NodeType, format!("nt{i}"));
            client
                .create_or_update(&identity, &NodeType::new(&identity, 3, i == 0))
                .await
                .unwrap();
        }

        let node_types: Vec<NodeType> = client
            .list_all(&cluster.children(ResourceKind::NodeType))
            .await
            .unwrap();

        assert_eq!(node_types.len(), 5);
        assert_eq!(client.provider().operation_counts().lists, 3);
    }
}
