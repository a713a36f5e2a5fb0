use std::path::Path;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use lectern_runtime::{classify, Category, SearchResult, DOC_EXTENSION, LISTING_SCORE};

use crate::docroot_guard::DocRootGuard;

/// Failure classes for document access, mapped to HTTP statuses by the gateway.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The requested path resolves outside the document root
    #[error("path escapes the document root: {0}")]
    OutsideRoot(String),
    #[error("document not found: {0}")]
    NotFound(String),
    /// Present on disk but not valid UTF-8 text
    #[error("document is not valid text: {0}")]
    NotText(String),
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only view over the document root. Knows both corpus layouts:
/// nested `<root>/<Category>/<file>.txt` and legacy flat `<root>/<file>.txt`.
pub struct DocumentStore {
    guard: DocRootGuard,
}

impl DocumentStore {
    pub fn new(guard: DocRootGuard) -> Self {
        Self { guard }
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// List the catalog for one category without consulting the engine.
    /// Results carry the listing-marker score: present, not ranked.
    /// An unreadable category directory degrades to a partial catalog
    /// rather than failing the whole browse.
    pub async fn browse(&self, category: Category) -> Result<Vec<SearchResult>, DocumentError> {
        let root = self.guard.root();
        let entries = sorted_entries(root).await.map_err(|e| DocumentError::Io {
            path: root.display().to_string(),
            source: e,
        })?;

        let mut results = Vec::new();
        let mut category_dir_seen = false;

        for (name, is_dir) in entries {
            if is_dir {
                // Directory names are unique; enumerate the match once
                if !category_dir_seen && name == category.name() {
                    category_dir_seen = true;
                    match self.list_category_dir(&name).await {
                        Ok(mut files) => results.append(&mut files),
                        Err(e) => {
                            warn!(category = %name, error = %e, "Skipping unreadable category directory");
                        }
                    }
                }
            } else if name.ends_with(DOC_EXTENSION) && classify(&name) == category {
                results.push(SearchResult {
                    filename: name,
                    score: LISTING_SCORE,
                });
            }
        }

        debug!(category = category.name(), count = results.len(), "Browse complete");
        Ok(results)
    }

    async fn list_category_dir(&self, dir_name: &str) -> Result<Vec<SearchResult>, std::io::Error> {
        let entries = sorted_entries(&self.guard.root().join(dir_name)).await?;
        Ok(entries
            .into_iter()
            .filter(|(name, is_dir)| !is_dir && name.ends_with(DOC_EXTENSION))
            .map(|(name, _)| SearchResult {
                filename: format!("{}/{}", dir_name, name),
                score: LISTING_SCORE,
            })
            .collect())
    }

    /// Read a document verbatim. The path is validated against the root
    /// before any filesystem access.
    pub async fn read_content(&self, rel_path: &str) -> Result<String, DocumentError> {
        let path = self.guard.resolve(rel_path)?;

        if !path.exists() {
            return Err(DocumentError::NotFound(rel_path.to_string()));
        }

        let bytes = fs::read(&path).await.map_err(|e| DocumentError::Io {
            path: rel_path.to_string(),
            source: e,
        })?;
        String::from_utf8(bytes).map_err(|_| DocumentError::NotText(rel_path.to_string()))
    }
}

/// Directory entries as (name, is_dir), sorted by name. readdir order is
/// platform-dependent; the catalog must be stable across requests.
async fn sorted_entries(dir: &Path) -> Result<Vec<(String, bool)>, std::io::Error> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
    }
    entries.sort();
    Ok(entries)
}
