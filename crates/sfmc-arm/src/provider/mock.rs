//! Mock resource provider for testing
//!
//! This provider keeps documents in memory, useful for unit tests
//! without a control plane.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use sfmc_core::{ArmResource, CollectionRef, ProvisioningState, ResourceIdentity};

use super::{
    DEFAULT_PAGE_SIZE, Document, Page, ResourceProvider, not_found, paginate, stamp_document,
    storage_key, strip_write_only, to_document,
};
use crate::error::{ArmError, Result};

/// In-memory provider for testing
#[derive(Clone)]
pub struct MockProvider {
    /// Storage: lowercased resource id -> document
    store: Arc<RwLock<BTreeMap<String, Document>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
    /// Terminal states for upcoming `create_or_update` calls, per resource
    scripted_states: Arc<RwLock<HashMap<String, VecDeque<ProvisioningState>>>>,
    /// Remote errors for upcoming calls, per resource
    scripted_errors: Arc<RwLock<HashMap<String, String>>>,
    page_size: usize,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub exists: usize,
    pub gets: usize,
    pub lists: usize,
    pub creates: usize,
    pub updates: usize,
}

impl OperationCounts {
    /// Number of `create_or_update` calls
    pub fn puts(&self) -> usize {
        self.creates + self.updates
    }
}

impl MockProvider {
    /// Create a new empty mock provider
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(BTreeMap::new())),
            operations: Arc::new(RwLock::new(OperationCounts::default())),
            scripted_states: Arc::new(RwLock::new(HashMap::new())),
            scripted_errors: Arc::new(RwLock::new(HashMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Use a smaller page size to exercise continuation
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Store a representation as-is, without stamping or counting
    pub fn seed<T: ArmResource>(&self, resource: &T) -> Result<()> {
        let identity = resource.identity()?;
        let document = to_document(resource)?;
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(storage_key(&identity), document);
        Ok(())
    }

    /// Make the next `create_or_update` of `identity` end in `state`
    ///
    /// Calls queue up; each put consumes one scripted state.
    pub fn script_provisioning(&self, identity: &ResourceIdentity, state: ProvisioningState) {
        self.scripted_states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(storage_key(identity))
            .or_default()
            .push_back(state);
    }

    /// Make the next call touching `identity` fail with a remote error
    pub fn fail_next(&self, identity: &ResourceIdentity, message: impl Into<String>) {
        self.scripted_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(storage_key(identity), message.into());
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset operation counts
    pub fn reset_counts(&self) {
        let mut ops = self.operations.write().unwrap_or_else(PoisonError::into_inner);
        *ops = OperationCounts::default();
    }

    /// Stored document, bypassing counters
    pub fn document(&self, identity: &ResourceIdentity) -> Option<Document> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&storage_key(identity))
            .cloned()
    }

    /// Count stored resources
    pub fn resource_count(&self) -> usize {
        self.store.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn count(&self, update: impl FnOnce(&mut OperationCounts)) {
        let mut ops = self.operations.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut ops);
    }

    fn take_scripted_error(&self, identity: &ResourceIdentity) -> Result<()> {
        let scripted = self
            .scripted_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&storage_key(identity));
        match scripted {
            Some(message) => Err(ArmError::Remote(message)),
            None => Ok(()),
        }
    }

    fn contains(&self, identity: &ResourceIdentity) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&storage_key(identity))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProvider for MockProvider {
    async fn get(&self, identity: &ResourceIdentity) -> Result<Document> {
        self.count(|ops| ops.gets += 1);
        self.take_scripted_error(identity)?;

        self.document(identity).ok_or_else(|| not_found(identity))
    }

    async fn exists(&self, identity: &ResourceIdentity) -> Result<bool> {
        self.count(|ops| ops.exists += 1);
        self.take_scripted_error(identity)?;

        Ok(self.contains(identity))
    }

    async fn create_or_update(
        &self,
        identity: &ResourceIdentity,
        mut document: Document,
    ) -> Result<Document> {
        self.take_scripted_error(identity)?;

        if let Some(parent) = identity.parent() {
            if !self.contains(&parent) {
                return Err(not_found(&parent));
            }
        }

        let key = storage_key(identity);
        let state = self
            .scripted_states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ProvisioningState::Succeeded);

        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let previous = store.get(&key);
        let is_update = previous.is_some();

        stamp_document(identity, &mut document, previous, state, Utc::now())?;
        strip_write_only(&mut document);
        store.insert(key, document.clone());
        drop(store);

        self.count(|ops| {
            if is_update {
                ops.updates += 1;
            } else {
                ops.creates += 1;
            }
        });

        Ok(document)
    }

    async fn list_page(
        &self,
        collection: &CollectionRef,
        continuation: Option<&str>,
    ) -> Result<Page> {
        self.count(|ops| ops.lists += 1);

        let prefix = format!("{}/", collection.path().to_lowercase());
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let members: Vec<Document> = store
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|(_, doc)| doc.clone())
            .collect();

        paginate(members, continuation, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sfmc_core::{ManagedCluster, ResourceKind};

    fn cluster_identity() -> ResourceIdentity {
        ResourceIdentity::cluster("s", "rg", "c1")
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let provider = MockProvider::new();
        let identity = cluster_identity();

        assert!(!provider.exists(&identity).await.unwrap());
        provider
            .create_or_update(&identity, json!({ "location": "eastus" }))
            .await
            .unwrap();

        let doc = provider.get(&identity).await.unwrap();
        assert_eq!(doc["name"], "c1");
        assert_eq!(doc["location"], "eastus");

        let counts = provider.operation_counts();
        assert_eq!(counts.creates, 1);
        assert_eq!(counts.gets, 1);
        assert_eq!(counts.exists, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let provider = MockProvider::new();
        provider
            .create_or_update(&cluster_identity(), json!({}))
            .await
            .unwrap();

        let upper = ResourceIdentity::cluster("s", "RG", "C1");
        assert!(provider.exists(&upper).await.unwrap());
    }

    #[tokio::test]
    async fn test_child_requires_parent() {
        let provider = MockProvider::new();
        let node_type = cluster_identity().child(ResourceKind::NodeType, "nt1");

        let err = provider.create_or_update(&node_type, json!({})).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(provider.resource_count(), 0);
    }

    #[tokio::test]
    async fn test_scripted_state_applies_once() {
        let provider = MockProvider::new();
        let identity = cluster_identity();
        provider.script_provisioning(&identity, ProvisioningState::Failed);

        let first = provider.create_or_update(&identity, json!({})).await.unwrap();
        let second = provider.create_or_update(&identity, json!({})).await.unwrap();

        assert_eq!(first["provisioningState"], "Failed");
        assert_eq!(second["provisioningState"], "Succeeded");
        assert_eq!(provider.operation_counts().updates, 1);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let provider = MockProvider::new();
        let identity = cluster_identity();
        provider.fail_next(&identity, "throttled");

        let err = provider.get(&identity).await.unwrap_err();
        assert!(matches!(err, ArmError::Remote(ref m) if m == "throttled"));
        assert!(provider.get(&identity).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_only_direct_members() {
        let provider = MockProvider::new().with_page_size(1);
        for name in ["a", "b"] {
            provider
                .seed(&ManagedCluster::new(&ResourceIdentity::cluster("s", "rg", name), "eastus"))
                .unwrap();
        }
        let cluster = ResourceIdentity::cluster("s", "rg", "a");
        provider
            .create_or_update(&cluster.child(ResourceKind::NodeType, "nt1"), json!({}))
            .await
            .unwrap();

        let collection = CollectionRef::clusters("s", "rg");
        let first = provider.list_page(&collection, None).await.unwrap();
        assert_eq!(first.items.len(), 1);
        let second = provider
            .list_page(&collection, first.next.as_deref())
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next.is_none());
    }
}
