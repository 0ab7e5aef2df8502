//! Project i18n configuration
//!
//! A [`ConfigProvider`] supplies the project's [`I18nConfig`]; [`load_config`]
//! merges it with [`PluginOptions`] and defaults into a [`ResolvedConfig`].
//! Explicit plugin options win over the config file, which wins over defaults.

mod error;
mod urls;

pub use error::{ConfigError, Result};
pub use urls::{localize_path, localize_urls, UrlPattern, API_PREFIX};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CACHE_DIR_NAME;

/// Default config file name, relative to the project root
pub const DEFAULT_CONFIG_FILE: &str = "i18n.config.yaml";

pub const DEFAULT_COOKIE_NAME: &str = "lang";
pub const DEFAULT_PROJECT: &str = "project.inlang";
pub const DEFAULT_OUTDIR: &str = "src/i18n/generated";
pub const DEFAULT_SCOPE: &str = "@repo";
pub const DEFAULT_URLS: &[&str] = &[
    "/",
    "/auth/:path(.*)?",
    "/dashboard/:path(.*)?",
    "/api/:path(.*)?",
];

/// Placeholder in `pathPattern` replaced by each locale
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// How the compiler organizes generated message modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStructure {
    LocaleModules,
    #[default]
    MessageModules,
}

/// Locale resolution strategy, tried in list order by the generated runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    Url,
    Cookie,
    PreferredLanguage,
    BaseLocale,
    GlobalVariable,
    LocalStorage,
}

impl Strategy {
    pub fn defaults() -> Vec<Strategy> {
        vec![
            Strategy::Url,
            Strategy::Cookie,
            Strategy::PreferredLanguage,
            Strategy::BaseLocale,
        ]
    }
}

/// Config file contents as authored by the project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    /// Message file location with a `{locale}` placeholder
    pub path_pattern: String,
    pub base_locale: String,
    pub locales: Vec<String>,
    #[serde(default)]
    pub urls: Option<Vec<String>>,
    #[serde(default)]
    pub output_structure: Option<OutputStructure>,
    #[serde(default)]
    pub cookie_name: Option<String>,
    #[serde(default)]
    pub strategy: Option<Vec<Strategy>>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Compiler project directory
    #[serde(default)]
    pub project: Option<PathBuf>,
    /// Directory the compiler writes into
    #[serde(default)]
    pub outdir: Option<PathBuf>,
}

/// Options passed explicitly by the host, overriding the config file
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    pub project: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub output_structure: Option<OutputStructure>,
    pub cookie_name: Option<String>,
    pub strategy: Option<Vec<Strategy>>,
    pub urls: Option<Vec<String>>,
    pub cache_dir: Option<PathBuf>,
    /// Package scope prefixed to virtual module ids
    pub scope: Option<String>,
}

/// Fully merged configuration with absolute paths
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub project: PathBuf,
    pub outdir: PathBuf,
    pub cache_dir: PathBuf,
    pub scope: String,
    pub output_structure: OutputStructure,
    pub cookie_name: String,
    pub strategy: Vec<Strategy>,
    pub locales: Vec<String>,
    pub base_locale: String,
    pub path_pattern: String,
    pub urls: Vec<String>,
    pub url_patterns: Vec<UrlPattern>,
    pub project_id: Option<String>,
}

impl ResolvedConfig {
    /// Absolute glob matching every message file of every locale
    pub fn message_glob(&self) -> String {
        let relative = self.path_pattern.replace(LOCALE_PLACEHOLDER, "*");
        if Path::new(&relative).is_absolute() {
            return relative;
        }
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        format!(
            "{}/{}",
            root.trim_end_matches('/'),
            relative.trim_start_matches("./")
        )
    }
}

/// Source of the project's [`I18nConfig`]
pub trait ConfigProvider {
    fn load(&self) -> Result<I18nConfig>;
}

/// Reads the config from a YAML or JSON file, chosen by extension
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> Result<I18nConfig> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !matches!(extension, "yaml" | "yml" | "json") {
            return Err(ConfigError::UnsupportedFormat(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        let parse_error = |message: String| ConfigError::Parse {
            path: self.path.clone(),
            message,
        };
        if extension == "json" {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))
        } else {
            serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))
        }
    }
}

/// Serves a config held in memory
#[derive(Debug, Clone)]
pub struct StaticConfigProvider(pub I18nConfig);

impl ConfigProvider for StaticConfigProvider {
    fn load(&self) -> Result<I18nConfig> {
        Ok(self.0.clone())
    }
}

fn absolutize(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

fn validate(config: &I18nConfig) -> Result<()> {
    if config.path_pattern.trim().is_empty() {
        return Err(ConfigError::EmptyField("pathPattern"));
    }
    if config.locales.is_empty() {
        return Err(ConfigError::NoLocales);
    }
    if !config.locales.contains(&config.base_locale) {
        return Err(ConfigError::UnknownBaseLocale {
            base_locale: config.base_locale.clone(),
            locales: config.locales.join(", "),
        });
    }
    Ok(())
}

/// Load the project config and merge it with `options` and defaults
///
/// Provider failures are returned as-is; there is no fallback config.
pub fn load_config(
    provider: &dyn ConfigProvider,
    root: &Path,
    options: &PluginOptions,
) -> Result<ResolvedConfig> {
    let file = provider.load()?;
    validate(&file)?;

    let urls = options
        .urls
        .clone()
        .or(file.urls)
        .unwrap_or_else(|| DEFAULT_URLS.iter().map(|url| url.to_string()).collect());
    let url_patterns = localize_urls(&urls, &file.locales);

    let project = options
        .project
        .clone()
        .or(file.project)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT));
    let outdir = options
        .outdir
        .clone()
        .or(file.outdir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTDIR));
    let cache_dir = options
        .cache_dir
        .clone()
        .or(file.cache_dir)
        .unwrap_or_else(|| PathBuf::from(CACHE_DIR_NAME));

    let resolved = ResolvedConfig {
        root: root.to_path_buf(),
        project: absolutize(root, project),
        outdir: absolutize(root, outdir),
        cache_dir: absolutize(root, cache_dir),
        scope: options
            .scope
            .clone()
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
        output_structure: options
            .output_structure
            .or(file.output_structure)
            .unwrap_or_default(),
        cookie_name: options
            .cookie_name
            .clone()
            .or(file.cookie_name)
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
        strategy: options
            .strategy
            .clone()
            .or(file.strategy)
            .unwrap_or_else(Strategy::defaults),
        locales: file.locales,
        base_locale: file.base_locale,
        path_pattern: file.path_pattern,
        urls,
        url_patterns,
        project_id: file.project_id,
    };

    tracing::debug!(
        locales = ?resolved.locales,
        outdir = %resolved.outdir.display(),
        "Resolved i18n config"
    );
    Ok(resolved)
}
