use std::path::Path;
use std::sync::Arc;

use crate::cache::{hash_files, CacheStore, I18N_NAMESPACE};
use crate::compiler::MessageCompiler;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::gate::{ensure_compiled, CompileOutcome, ConfigSnapshot};
use crate::virtual_modules::{ModuleHook, VirtualModules};

/// Wildcards stay within one path component, as they do when hashing.
const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Build-tool plugin compiling i18n messages and serving them as virtual modules
///
/// A host adapter calls [`I18nPlugin::build_start`] once per build (or
/// [`I18nPlugin::rebuild`] when message files change) and forwards its
/// resolve/load hooks to the [`ModuleHook`] implementation.
pub struct I18nPlugin<M> {
    config: ResolvedConfig,
    compiler: M,
    cache: Arc<CacheStore<ConfigSnapshot>>,
    modules: VirtualModules,
    message_pattern: Option<glob::Pattern>,
}

impl<M: MessageCompiler> I18nPlugin<M> {
    /// Create a plugin with its own `i18n` cache under `config.cache_dir`
    pub fn new(config: ResolvedConfig, compiler: M) -> Self {
        let cache = Arc::new(CacheStore::in_dir(&config.cache_dir, I18N_NAMESPACE));
        Self::with_cache(config, compiler, cache)
    }

    pub fn with_cache(
        config: ResolvedConfig,
        compiler: M,
        cache: Arc<CacheStore<ConfigSnapshot>>,
    ) -> Self {
        let modules = VirtualModules::new(config.scope.clone(), &config.outdir);
        let glob = config.message_glob();
        let message_pattern = match glob::Pattern::new(&glob) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(
                    pattern = %glob,
                    error = %e,
                    "Invalid message file pattern; change detection disabled"
                );
                None
            }
        };
        Self {
            config,
            compiler,
            cache,
            modules,
            message_pattern,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<CacheStore<ConfigSnapshot>> {
        &self.cache
    }

    pub fn compiler(&self) -> &M {
        &self.compiler
    }

    pub fn modules(&self) -> &VirtualModules {
        &self.modules
    }

    /// Fingerprint the message files and compile them if needed
    pub async fn build_start(&self) -> Result<CompileOutcome> {
        let fingerprint = hash_files(&self.config.message_glob())?;
        ensure_compiled(&self.cache, &self.compiler, &fingerprint, &self.config).await
    }

    /// Like [`I18nPlugin::build_start`], discarding the cache first when `force` is set
    pub async fn rebuild(&self, force: bool) -> Result<CompileOutcome> {
        if force {
            self.cache.clear()?;
        }
        self.build_start().await
    }

    /// Whether `path` is one of the tracked message files
    pub fn is_message_file(&self, path: &Path) -> bool {
        self.message_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
    }
}

impl<M> ModuleHook for I18nPlugin<M> {
    fn resolve_id(&self, id: &str) -> Option<String> {
        self.modules.resolve_id(id)
    }

    fn load(&self, id: &str) -> Option<&str> {
        self.modules.load(id)
    }
}
