//! Incremental compilation of i18n message files.
//!
//! Message files are fingerprinted from their metadata, compared against a
//! persisted cache record, and handed to an external compiler only when they
//! or the relevant configuration changed. The compiled output is exposed to
//! bundlers through three fixed virtual module ids.

pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod gate;
pub mod plugin;
pub mod virtual_modules;

pub use cache::{hash_files, CacheDiff, CacheError, CacheMetadata, CacheStore, Fingerprint};
pub use compiler::{CommandCompiler, CompileError, CompileParams, MessageCompiler};
pub use config::{
    load_config, ConfigError, ConfigProvider, FileConfigProvider, I18nConfig, OutputStructure,
    PluginOptions, ResolvedConfig, StaticConfigProvider, Strategy,
};
pub use error::{GlossaError, Result};
pub use gate::{ensure_compiled, CompileOutcome, ConfigSnapshot};
pub use plugin::I18nPlugin;
pub use virtual_modules::{ModuleHook, VirtualModule, VirtualModules};
