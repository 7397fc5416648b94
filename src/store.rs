use crate::errors::PatchError;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Abstract document store: load the full text of a document, store it back.
///
/// The engine performs exactly one `load` and at most one `store` per patch
/// invocation and assumes single-writer access per document; coordinating
/// concurrent writers to the same document is the caller's job.
pub trait DocumentStore {
    fn load(&self, path: &Path) -> Result<String, PatchError>;
    fn store(&self, path: &Path, text: &str) -> Result<(), PatchError>;
}

/// File-system store with crash-safe writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl DocumentStore for FsStore {
    fn load(&self, path: &Path) -> Result<String, PatchError> {
        Ok(fs::read_to_string(path)?)
    }

    fn store(&self, path: &Path, text: &str) -> Result<(), PatchError> {
        atomic_write(path, text.as_bytes())
    }
}

/// Atomic file write: tempfile + fsync + rename. Either the full write
/// succeeds or the original file is left untouched.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), PatchError> {
    // Tempfile in the same directory so the rename stays on one filesystem.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// In-memory store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemStore {
    documents: Mutex<HashMap<PathBuf, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.lock().insert(path.into(), text.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemStore {
    fn load(&self, path: &Path) -> Result<String, PatchError> {
        self.get(path).ok_or_else(|| {
            PatchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such document: {}", path.display()),
            ))
        })
    }

    fn store(&self, path: &Path, text: &str) -> Result<(), PatchError> {
        self.insert(path, text);
        Ok(())
    }
}
