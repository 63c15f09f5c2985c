//! Where encoded variants go.
//!
//! The pipeline only needs two capabilities from storage: put bytes at a
//! path and remove a path. [`Store`] is exactly that, so local disk, blob
//! storage and test doubles all plug in the same way.
//!
//! Contract for implementors:
//! - `save` overwrites whatever is at `path`.
//! - `delete` of a path that does not exist is `Ok(())`.
//! - Each call is atomic for its own path; concurrent calls on distinct
//!   paths must be safe (`Send + Sync`).
//!
//! Two implementations ship with the crate: [`FsStore`] (a directory on local
//! disk, used by the CLI) and [`MemoryStore`] (an in-process map).

use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// Byte storage keyed by `/`-separated paths.
pub trait Store: Send + Sync {
    /// Store `bytes` at `path`, replacing any previous content.
    fn save(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove `path`. Missing paths are not an error.
    fn delete(&self, path: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn save(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).save(path, bytes)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn save(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).save(path, bytes)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }
}

/// Store rooted at a local directory.
///
/// Saves are staged in a temporary file beside the target and renamed into
/// place. Paths are resolved relative to the root; absolute paths and `..`
/// components are rejected so a caller-supplied name cannot escape it.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem location for a storage path.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if path.is_empty() || escapes {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Store for FsStore {
    fn save(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        let dir = target.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(dir)?;
        // Readers see the old file or the new one, never a partial write
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(bytes)?;
        staged.persist(&target).map_err(|e| e.error)?;
        debug!("saved {} bytes to {}", bytes.len(), target.display());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target) {
            Ok(()) => {
                debug!("deleted {}", target.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store backed by a sorted map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panic mid-insert cannot leave the map half-written
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects().contains_key(path)
    }

    /// All stored paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.objects().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }
}

impl Store for MemoryStore {
    fn save(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.objects().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.objects().remove(path);
        Ok(())
    }
}
