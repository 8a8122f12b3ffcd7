//! Resource providers
//!
//! The provider is the collaborator that owns transport, authentication,
//! long-running operation polling and the remote state machine. sfmc only
//! needs `get`, `exists`, `create_or_update` and paged listing from it.
//!
//! - **File**: Stores documents under a local state directory (offline use)
//! - **Mock**: Keeps documents in memory and counts operations (tests)

mod file;
mod mock;

pub use file::FileProvider;
pub use mock::{MockProvider, OperationCounts};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sfmc_core::{CollectionRef, ProvisioningState, ResourceIdentity};

use crate::error::{ArmError, Result};

/// A resource representation as exchanged with the provider
pub type Document = serde_json::Value;

/// Default number of documents per listing page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One page of a listing
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Document>,

    /// Continuation token for the next page, `None` on the last page
    pub next: Option<String>,
}

/// Collaborator contract keyed by resource identity
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Fetch a resource, failing with `NotFound` if absent
    async fn get(&self, identity: &ResourceIdentity) -> Result<Document>;

    /// Replace a resource with `document` and return the stored representation
    ///
    /// Returns once the operation reached a terminal provisioning state.
    async fn create_or_update(
        &self,
        identity: &ResourceIdentity,
        document: Document,
    ) -> Result<Document>;

    /// Fetch one page of a collection
    async fn list_page(
        &self,
        collection: &CollectionRef,
        continuation: Option<&str>,
    ) -> Result<Page>;

    /// Check if a resource exists
    async fn exists(&self, identity: &ResourceIdentity) -> Result<bool> {
        match self.get(identity).await {
            Ok(_) => Ok(true),
            Err(ArmError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Serialize a representation into a document
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a document into a representation
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(document)?)
}

/// Storage key of an identity; resource ids compare case-insensitively
pub(crate) fn storage_key(identity: &ResourceIdentity) -> String {
    identity.resource_id().to_lowercase()
}

pub(crate) fn not_found(identity: &ResourceIdentity) -> ArmError {
    ArmError::NotFound {
        kind: identity.kind,
        id: identity.resource_id(),
    }
}

/// Fill in the fields the control plane owns
///
/// `previous` is the stored document being replaced, if any; its creation
/// time is kept.
pub(crate) fn stamp_document(
    identity: &ResourceIdentity,
    document: &mut Document,
    previous: Option<&Document>,
    state: ProvisioningState,
    now: DateTime<Utc>,
) -> Result<()> {
    let created_at = previous
        .and_then(|doc| doc.pointer("/systemData/createdAt"))
        .cloned()
        .unwrap_or_else(|| serde_json::json!(now));

    let Some(object) = document.as_object_mut() else {
        return Err(ArmError::Serialization(format!(
            "document for '{}' is not an object",
            identity.resource_id()
        )));
    };

    object.insert("id".to_string(), identity.resource_id().into());
    object.insert("name".to_string(), identity.name.clone().into());
    object.insert("type".to_string(), identity.kind.resource_type().into());
    object.insert("provisioningState".to_string(), serde_json::to_value(state)?);
    object.insert(
        "systemData".to_string(),
        serde_json::json!({
            "createdAt": created_at,
            "lastModifiedAt": now,
        }),
    );
    Ok(())
}

/// Drop fields the control plane accepts but never returns
pub(crate) fn strip_write_only(document: &mut Document) {
    if let Some(object) = document.as_object_mut() {
        object.remove("adminPassword");
        if let Some(extensions) = object.get_mut("vmExtensions").and_then(|v| v.as_array_mut()) {
            for extension in extensions {
                if let Some(extension) = extension.as_object_mut() {
                    extension.remove("protectedSettings");
                }
            }
        }
    }
}

/// Slice one page out of a sorted listing using an offset continuation token
pub(crate) fn paginate(
    mut items: Vec<Document>,
    continuation: Option<&str>,
    page_size: usize,
) -> Result<Page> {
    let offset = match continuation {
        Some(token) => token
            .parse::<usize>()
            .map_err(|_| ArmError::invalid_argument(format!("invalid continuation token '{token}'")))?,
        None => 0,
    };
    let page_size = page_size.max(1);
    let end = offset.saturating_add(page_size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    let items = if offset < items.len() {
        items.drain(offset..end).collect()
    } else {
        Vec::new()
    };
    Ok(Page { items, next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sfmc_core::ResourceKind;

    #[test]
    fn test_paginate() {
        let items: Vec<Document> = (0..5).map(|i| json!(i)).collect();

        let first = paginate(items.clone(), None, 2).unwrap();
        assert_eq!(first.items, vec![json!(0), json!(1)]);
        assert_eq!(first.next.as_deref(), Some("2"));

        let last = paginate(items.clone(), Some("4"), 2).unwrap();
        assert_eq!(last.items, vec![json!(4)]);
        assert!(last.next.is_none());

        assert!(paginate(items, Some("abc"), 2).is_err());
    }

    #[test]
    fn test_stamp_keeps_creation_time() {
        let identity = ResourceIdentity::cluster("s", "rg", "c1").child(ResourceKind::NodeType, "nt1");
        let created: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let mut previous = json!({});
        stamp_document(&identity, &mut previous, None, ProvisioningState::Succeeded, created).unwrap();

        let mut document = json!({ "vmInstanceCount": 3 });
        stamp_document(&identity, &mut document, Some(&previous), ProvisioningState::Succeeded, Utc::now())
            .unwrap();

        assert_eq!(document["name"], "nt1");
        assert_eq!(document["provisioningState"], "Succeeded");
        assert_eq!(document["systemData"]["createdAt"], previous["systemData"]["createdAt"]);
        assert_eq!(document["type"], "Microsoft.ServiceFabric/managedClusters/nodeTypes");
    }

    #[test]
    fn test_strip_write_only() {
        let mut document = json!({
            "adminPassword": "secret",
            "vmExtensions": [{ "name": "ext", "protectedSettings": { "key": "v" } }]
        });
        strip_write_only(&mut document);

        assert!(document.get("adminPassword").is_none());
        assert!(document["vmExtensions"][0].get("protectedSettings").is_none());
    }
}
