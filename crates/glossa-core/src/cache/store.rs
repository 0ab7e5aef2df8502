use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::metadata::{CacheDiff, CacheMetadata, ConfigChange, FileChange};
use super::{CacheError, Result, RUNTIME_ARTIFACT};

/// Memoized view of the backing file
#[derive(Debug)]
enum CacheState<C> {
    /// Disk has not been consulted since construction or the last `clear`
    Unloaded,
    /// Result of the last disk read or save; `None` means no usable record
    Loaded(Option<CacheMetadata<C>>),
}

/// Persisted cache record for a single namespace
///
/// The record lives in `<dir>/<namespace>.json`. It is read from disk at most
/// once per process until [`CacheStore::clear`] is called; [`CacheStore::save`]
/// keeps the in-memory copy in sync. Only one build process is expected to
/// own a namespace at a time.
#[derive(Debug)]
pub struct CacheStore<C> {
    namespace: String,
    path: PathBuf,
    state: Mutex<CacheState<C>>,
}

impl<C> CacheStore<C>
where
    C: Serialize + DeserializeOwned + PartialEq + Clone,
{
    /// Create a store for `namespace` backed by a file in `dir`
    pub fn in_dir(dir: impl AsRef<Path>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let path = dir.as_ref().join(format!("{}.json", namespace));
        Self {
            namespace,
            path,
            state: Mutex::new(CacheState::Unloaded),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored record, loading it from disk on first use
    pub fn read(&self) -> Option<CacheMetadata<C>> {
        let mut state = self.state.lock();
        if let CacheState::Loaded(cached) = &*state {
            tracing::debug!(namespace = %self.namespace, "Using memoized cache record");
            return cached.clone();
        }

        let loaded = self.load_from_disk();
        *state = CacheState::Loaded(loaded.clone());
        loaded
    }

    fn load_from_disk(&self) -> Option<CacheMetadata<C>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No cache record on disk");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read cache record");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt cache record");
                None
            }
        }
    }

    /// Compare a proposed fingerprint and configuration against the record
    pub fn diff(&self, current_hash: &str, current_config: &C) -> CacheDiff<C> {
        let Some(cached) = self.read() else {
            return CacheDiff::missing();
        };

        let files = (cached.hash != current_hash).then(|| FileChange {
            old_hash: cached.hash.clone(),
            new_hash: current_hash.to_string(),
        });
        let config = (&cached.config != current_config).then(|| ConfigChange {
            old: cached.config.clone(),
            new: current_config.clone(),
        });

        CacheDiff::from_changes(files, config)
    }

    /// Decide whether the compiler must run
    ///
    /// Besides the record comparison, the output directory and its runtime
    /// artifact must exist; a deleted output forces recompilation even when
    /// the record is current.
    pub fn should_recompile(&self, current_hash: &str, current_config: &C, output_dir: &Path) -> bool {
        let diff = self.diff(current_hash, current_config);
        if diff.has_changes {
            tracing::info!(
                namespace = %self.namespace,
                "Recompiling: {}",
                diff.reasons.join(", ")
            );
            return true;
        }

        if !output_dir.is_dir() || !output_dir.join(RUNTIME_ARTIFACT).is_file() {
            tracing::info!(
                namespace = %self.namespace,
                output = %output_dir.display(),
                "Recompiling: compiled output missing"
            );
            return true;
        }

        false
    }

    /// Replace the record on disk and in memory
    ///
    /// The file is written to a temporary sibling and renamed into place so a
    /// reader never observes a partial record.
    pub fn save(&self, hash: &str, config: &C, files: &[PathBuf]) -> Result<()> {
        let metadata = CacheMetadata::new(hash.to_string(), config.clone(), files.to_vec());
        let json = serde_json::to_string_pretty(&metadata)?;

        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir).map_err(|e| CacheError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CacheError::io(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| CacheError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::io(&self.path, e.error))?;

        tracing::debug!(namespace = %self.namespace, path = %self.path.display(), "Saved cache record");
        *self.state.lock() = CacheState::Loaded(Some(metadata));
        Ok(())
    }

    /// Delete the record and forget the memoized copy
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(&self.path, e)),
        }
        *self.state.lock() = CacheState::Unloaded;
        tracing::debug!(namespace = %self.namespace, "Cleared cache record");
        Ok(())
    }
}
