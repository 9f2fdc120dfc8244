//! Knowledge base loading
//!
//! The knowledge base is a fixed set of named JSON resources (equipment
//! catalogue, venue guides, FAQ/checklists, software and platform guides)
//! kept on disk and loaded once per process. Loading tolerates partial
//! failure: a missing or malformed resource is logged and skipped so the
//! rest of the knowledge base stays usable.


use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Named, parsed knowledge documents. Treated as immutable for the process
/// lifetime once loaded.
pub type Documents = BTreeMap<String, Value>;

/// The named resources that make up the knowledge base
pub const KNOWLEDGE_RESOURCES: &[&str] = &[
    "checklists_and_faq",
    "equipment_list",
    "locations",
    "obs_guide",
    "platforms",
    "zoom_guide",
];

#[derive(Debug, Error)]
#[error("Failed to load knowledge resource '{resource}': {source}")]
pub struct LoadError {
    pub resource: String,
    #[source]
    pub source: anyhow::Error,
}

/// Loader for the on-disk knowledge base directory
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    data_dir: PathBuf,
}

impl KnowledgeBase {
    #[inline]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[inline]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load a single named resource from `<data_dir>/<resource>.json`
    #[inline]
    pub fn load(&self, resource: &str) -> Result<Value, LoadError> {
        let path = self.data_dir.join(format!("{resource}.json"));

        let content = fs::read_to_string(&path).map_err(|e| LoadError {
            resource: resource.to_string(),
            source: anyhow::Error::new(e).context(format!("reading {}", path.display())),
        })?;

        let document: Value = serde_json::from_str(&content).map_err(|e| LoadError {
            resource: resource.to_string(),
            source: anyhow::Error::new(e).context(format!("parsing {}", path.display())),
        })?;

        debug!("Loaded knowledge resource '{}'", resource);
        Ok(document)
    }

    /// Load every known resource. Per-resource failures are logged and the
    /// resource is skipped; the returned set may be smaller than
    /// [`KNOWLEDGE_RESOURCES`], down to empty.
    #[inline]
    pub fn load_all(&self) -> Documents {
        let mut documents = Documents::new();

        for &resource in KNOWLEDGE_RESOURCES {
            match self.load(resource) {
                Ok(document) => {
                    documents.insert(resource.to_string(), document);
                }
                Err(e) => {
                    warn!("Skipping knowledge resource: {e:#}");
                }
            }
        }

        info!(
            "Loaded {}/{} knowledge resources from {}",
            documents.len(),
            KNOWLEDGE_RESOURCES.len(),
            self.data_dir.display()
        );

        documents
    }
}
