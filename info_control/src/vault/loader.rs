//! Vault access seam.
//!
//! The information control layer never touches the filesystem directly; it
//! asks a [`VaultLoader`] for vault-relative paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{ControlError, ControlResult};

/// How urgently a file is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPriority {
    Critical,
    High,
    #[default]
    Normal,
    Low,
}

/// Loads vault files by vault-relative path.
pub trait VaultLoader {
    /// Load a UTF-8 text file.
    fn load(&self, path: &str, priority: LoadPriority) -> ControlResult<String>;

    /// Load a file, treating any failure as absent.
    fn load_optional(&self, path: &str, priority: LoadPriority) -> Option<String> {
        match self.load(path, priority) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Vault file unavailable");
                None
            }
        }
    }
}

impl<L: VaultLoader + ?Sized> VaultLoader for &L {
    fn load(&self, path: &str, priority: LoadPriority) -> ControlResult<String> {
        (**self).load(path, priority)
    }
}

/// Loader rooted at a vault directory on disk.
#[derive(Debug, Clone)]
pub struct FsVaultLoader {
    root: PathBuf,
}

impl FsVaultLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault-relative path, refusing to escape the root.
    fn resolve(&self, path: &str) -> ControlResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ControlError::Load {
                path: path.to_string(),
                reason: "path must stay inside the vault".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl VaultLoader for FsVaultLoader {
    fn load(&self, path: &str, priority: LoadPriority) -> ControlResult<String> {
        let full = self.resolve(path)?;
        tracing::trace!(path = %path, ?priority, "Loading vault file");
        std::fs::read_to_string(&full).map_err(|e| ControlError::Load {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Map-backed loader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVaultLoader {
    files: HashMap<String, String>,
}

impl InMemoryVaultLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl VaultLoader for InMemoryVaultLoader {
    fn load(&self, path: &str, _priority: LoadPriority) -> ControlResult<String> {
        self.files.get(path).cloned().ok_or_else(|| ControlError::Load {
            path: path.to_string(),
            reason: "not found".to_string(),
        })
    }
}
