//! Incremental compilation cache for Glossa
//!
//! This module fingerprints the tracked message files and persists the
//! fingerprint together with a configuration snapshot, so that the external
//! message compiler only runs when something it depends on has changed.

mod error;
mod hash;
mod metadata;
mod store;

pub use error::{CacheError, Result};
pub use hash::{hash_files, Fingerprint};
pub use metadata::{CacheDiff, CacheMetadata, ConfigChange, FileChange};
pub use store::CacheStore;

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = ".glossa-cache";

/// Cache namespace used for compiled i18n messages
pub const I18N_NAMESPACE: &str = "i18n";

/// Artifact whose presence proves the compiler output directory is usable
pub const RUNTIME_ARTIFACT: &str = "runtime.js";
