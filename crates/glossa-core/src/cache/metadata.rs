use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Persisted record for one cache namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata<C> {
    /// Fingerprint of the tracked files at the last successful compilation
    pub hash: String,

    /// Configuration snapshot used for that compilation
    pub config: C,

    /// Files that were fingerprinted (diagnostics only, never compared)
    pub files: Vec<PathBuf>,

    /// Milliseconds since the Unix epoch when the record was saved
    pub timestamp: u64,
}

impl<C> CacheMetadata<C> {
    /// Create a record stamped with the current time
    pub fn new(hash: String, config: C, files: Vec<PathBuf>) -> Self {
        Self {
            hash,
            config,
            files,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub old_hash: String,
    pub new_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange<C> {
    pub old: C,
    pub new: C,
}

/// Result of comparing a proposed state against the stored record
#[derive(Debug, Clone, PartialEq)]
pub struct CacheDiff<C> {
    pub has_changes: bool,
    pub reasons: Vec<String>,
    pub files: Option<FileChange>,
    pub config: Option<ConfigChange<C>>,
}

impl<C> CacheDiff<C> {
    pub(crate) const CACHE_NOT_FOUND: &'static str = "Cache not found";
    pub(crate) const FILES_CHANGED: &'static str = "Message files changed";
    pub(crate) const CONFIG_CHANGED: &'static str = "Configuration changed";

    /// Diff reported when no readable record exists
    pub fn missing() -> Self {
        Self {
            has_changes: true,
            reasons: vec![Self::CACHE_NOT_FOUND.to_string()],
            files: None,
            config: None,
        }
    }

    pub(crate) fn from_changes(files: Option<FileChange>, config: Option<ConfigChange<C>>) -> Self {
        let mut reasons = Vec::new();
        if files.is_some() {
            reasons.push(Self::FILES_CHANGED.to_string());
        }
        if config.is_some() {
            reasons.push(Self::CONFIG_CHANGED.to_string());
        }
        Self {
            has_changes: !reasons.is_empty(),
            reasons,
            files,
            config,
        }
    }
}
