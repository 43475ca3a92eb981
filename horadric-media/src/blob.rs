//! Content-addressed blob storage for item images.
//!
//! Keys are relative slash-separated paths such as `items/<sha256>.png`.
//! Every backend derives a stable public URL from a key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::MediaError;

/// A key-value store for image bytes.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing blob.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), MediaError>;

    /// Read a blob, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MediaError>;

    fn exists(&self, key: &str) -> Result<bool, MediaError>;

    /// URL the blob is served from.
    fn public_url(&self, key: &str) -> String;
}

/// Reject keys that could escape the store root.
fn validate_key(key: &str) -> Result<(), MediaError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(MediaError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn join_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

// ── Local Filesystem ────────────────────────────────────────────────────────

/// Blobs stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    /// Open (creating if needed) a store rooted at `root`. Public URLs are
    /// `base_url` followed by the key.
    pub fn open(root: &Path, base_url: &str) -> Result<Self, MediaError> {
        std::fs::create_dir_all(root).map_err(|e| MediaError::StoreUnavailable {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        if !root.is_dir() {
            return Err(MediaError::StoreUnavailable {
                path: root.display().to_string(),
                message: "not a directory".to_string(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            base_url: base_url.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, MediaError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<(), MediaError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write then rename so readers never see a partial blob.
        let tmp = path.with_extension("partial");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Stored {key} ({} bytes)", bytes.len());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MediaError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, MediaError> {
        Ok(self.path_for(key)?.is_file())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.base_url, key)
    }
}

// ── In-Memory ───────────────────────────────────────────────────────────────

/// Blobs held in memory. Counts writes, which makes it useful in tests.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    base_url: String,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

impl MemoryBlobStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            base_url: base_url.to_string(),
        }
    }

    /// Number of `put` calls that stored a blob.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<(), MediaError> {
        validate_key(key)?;
        self.lock().insert(key.to_string(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MediaError> {
        Ok(self.lock().get(key).cloned())
    }

    fn exists(&self, key: &str) -> Result<bool, MediaError> {
        Ok(self.lock().contains_key(key))
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.base_url, key)
    }
}

// ── Read-Only Guard ─────────────────────────────────────────────────────────

/// Wraps a store and refuses every write. Used for dry runs.
pub struct ReadOnlyBlobStore<'a> {
    inner: &'a dyn BlobStore,
}

impl<'a> ReadOnlyBlobStore<'a> {
    pub fn new(inner: &'a dyn BlobStore) -> Self {
        Self { inner }
    }
}

impl BlobStore for ReadOnlyBlobStore<'_> {
    fn put(&self, key: &str, _bytes: &[u8], _content_type: &str) -> Result<(), MediaError> {
        Err(MediaError::ReadOnly(key.to_string()))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MediaError> {
        self.inner.get(key)
    }

    fn exists(&self, key: &str) -> Result<bool, MediaError> {
        self.inner.exists(key)
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }
}

#[cfg(test)]
#[path = "tests/blob_tests.rs"]
mod tests;
