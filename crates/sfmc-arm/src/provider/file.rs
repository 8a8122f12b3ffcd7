//! File-based resource provider
//!
//! Stores one JSON document per resource under a state directory. Useful for:
//! - Offline use of the CLI
//! - Development and testing without a control plane
//!
//! Write-only fields (`adminPassword`, extension `protectedSettings`) are
//! never persisted. A stored document that no longer parses is reported as a
//! remote error, like a malformed response from a control plane.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sfmc_core::{CollectionRef, ProvisioningState, ResourceIdentity};

use super::{
    DEFAULT_PAGE_SIZE, Document, Page, ResourceProvider, not_found, paginate, stamp_document,
    strip_write_only,
};
use crate::error::{ArmError, Result};

/// File-based resource provider
pub struct FileProvider {
    /// Base directory for storing documents
    base_dir: PathBuf,
    page_size: usize,
}

impl FileProvider {
    /// Create a new file provider
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        // Create base directory if it doesn't exist
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for a resource id prefix, one directory per lowercased segment
    fn dir_for(&self, path: &str) -> Result<PathBuf> {
        let mut dir = self.base_dir.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(ArmError::invalid_argument(format!(
                    "invalid path segment '{segment}' in '{path}'"
                )));
            }
            dir.push(segment.to_lowercase());
        }
        Ok(dir)
    }

    /// Get the path for a resource document
    fn document_path(&self, identity: &ResourceIdentity) -> Result<PathBuf> {
        let dir = self.dir_for(&identity.collection().path())?;
        let name = identity.name.to_lowercase();
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ArmError::invalid_argument(format!(
                "invalid resource name '{}'",
                identity.name
            )));
        }
        Ok(dir.join(format!("{name}.json")))
    }

    /// Read a document from file
    fn read_document(&self, path: &Path) -> Result<Document> {
        let data = std::fs::read(path)?;
        serde_json::from_slice(&data).map_err(|e| {
            ArmError::Remote(format!("unreadable document {}: {}", path.display(), e))
        })
    }

    /// Write a document to file
    fn write_document(&self, path: &Path, document: &Document) -> Result<()> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(document)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[async_trait]
impl ResourceProvider for FileProvider {
    async fn get(&self, identity: &ResourceIdentity) -> Result<Document> {
        let path = self.document_path(identity)?;

        if !path.exists() {
            return Err(not_found(identity));
        }

        self.read_document(&path)
    }

    async fn create_or_update(
        &self,
        identity: &ResourceIdentity,
        mut document: Document,
    ) -> Result<Document> {
        if let Some(parent) = identity.parent() {
            if !self.document_path(&parent)?.exists() {
                return Err(not_found(&parent));
            }
        }

        let path = self.document_path(identity)?;
        let previous = if path.exists() {
            Some(self.read_document(&path)?)
        } else {
            None
        };

        stamp_document(
            identity,
            &mut document,
            previous.as_ref(),
            ProvisioningState::Succeeded,
            Utc::now(),
        )?;
        strip_write_only(&mut document);
        self.write_document(&path, &document)?;

        tracing::debug!(path = %path.display(), "stored resource document");
        Ok(document)
    }

    async fn list_page(
        &self,
        collection: &CollectionRef,
        continuation: Option<&str>,
    ) -> Result<Page> {
        let dir = self.dir_for(&collection.path())?;
        if !dir.exists() {
            return Ok(Page::default());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            match self.read_document(&file) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    tracing::warn!("Skipping unreadable document {}: {}", file.display(), e);
                }
            }
        }

        paginate(documents, continuation, self.page_size)
    }
}
