use std::path::{Component, Path, PathBuf};

use crate::document_store::DocumentError;

/// Document-root-scoped path resolver — prevents path traversal attacks.
/// Every filesystem read keyed by a client-supplied path goes through here.
pub struct DocRootGuard {
    root: PathBuf,
}

impl DocRootGuard {
    pub fn new(root: PathBuf) -> Result<Self, DocumentError> {
        let root = root.canonicalize().map_err(|e| DocumentError::Io {
            path: root.display().to_string(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Resolve a client-provided path relative to the document root.
    /// Rejects paths that escape the root via `..` or symlinks.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, DocumentError> {
        let joined = self.root.join(requested);

        // For existing paths, canonicalize resolves symlinks
        let resolved = if joined.exists() {
            joined.canonicalize().map_err(|e| DocumentError::Io {
                path: requested.to_string(),
                source: e,
            })?
        } else {
            // Normalize `..` and `.` components without requiring the path to exist
            normalize_path(&joined)
        };

        if !resolved.starts_with(&self.root) {
            return Err(DocumentError::OutsideRoot(requested.to_string()));
        }
        Ok(resolved)
    }

    /// True iff `requested` resolves strictly inside the document root.
    pub fn is_safe(&self, requested: &str) -> bool {
        self.resolve(requested).is_ok()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Normalize a path by resolving `.` and `..` components without filesystem access.
fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for c in path.components() {
        match c {
            Component::ParentDir => {
                // Only pop normal components, never pop root/prefix
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                }
            }
            Component::CurDir => {}
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
