//! Persistent cache of image descriptions.
//!
//! Entries are keyed by the content hash of the image and the prompt, kept
//! in insertion order, and evicted oldest-first once the capacity is reached.
//! The cache file is plain JSON so it can be inspected or deleted by hand.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use xxhash_rust::xxh3::{xxh3_64, xxh3_128};

use crate::error::{Result, VisionError};

/// Default number of cached descriptions.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, insertion-ordered map from image/prompt key to description.
#[derive(Debug, Clone)]
pub struct ImageCache {
    path: Option<PathBuf>,
    capacity: usize,
    entries: IndexMap<String, String>,
    dirty: bool,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::in_memory(DEFAULT_CAPACITY)
    }
}

impl ImageCache {
    /// Creates a cache that is never written to disk.
    #[must_use]
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            capacity: capacity.max(1),
            entries: IndexMap::new(),
            dirty: false,
        }
    }

    /// Opens the cache stored at `path`.
    ///
    /// A missing file starts an empty cache. An unreadable or corrupt file is
    /// logged and also starts an empty cache. Entries beyond `capacity` are
    /// evicted oldest-first.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut cache = Self::in_memory(capacity);

        match read_entries(&path) {
            Ok(Some(entries)) => {
                cache.entries = entries;
                cache.evict();
                debug!(path = %path.display(), entries = cache.len(), "loaded image cache");
            }
            Ok(None) => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable image cache");
            }
        }

        cache.path = Some(path);
        cache
    }

    /// Cache key for an image and prompt pair.
    #[must_use]
    pub fn key(image: &[u8], prompt: &str) -> String {
        format!("{:032x}_{:016x}", xxh3_128(image), xxh3_64(prompt.as_bytes()))
    }

    /// Looks up a cached description.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores a description, evicting the oldest entry when full.
    pub fn insert(&mut self, key: String, description: String) {
        self.entries.insert(key, description);
        self.evict();
        self.dirty = true;
    }

    /// Number of cached descriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the cache to its backing file if it changed since the last flush.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Cache`] if the file or its directory cannot be written.
    pub fn flush(&mut self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let cache_error = |source| VisionError::Cache {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(cache_error)?;
        }
        let json = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(cache_error)?;
        fs::rename(&tmp, path).map_err(cache_error)?;

        self.dirty = false;
        debug!(path = %path.display(), entries = self.entries.len(), "flushed image cache");
        Ok(())
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }
}

fn read_entries(path: &Path) -> Result<Option<IndexMap<String, String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|source| VisionError::Cache {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}
