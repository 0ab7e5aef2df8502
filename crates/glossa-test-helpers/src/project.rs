//! Scratch project layouts on disk

use glossa_core::config::{
    load_config, I18nConfig, PluginOptions, ResolvedConfig, StaticConfigProvider,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Message file pattern used by every test project
pub const PATH_PATTERN: &str = "./messages/{locale}.json";

/// A temporary project directory with a `messages/` folder
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("messages")).expect("Failed to create messages dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn message_path(&self, locale: &str) -> PathBuf {
        self.root().join("messages").join(format!("{}.json", locale))
    }

    /// Write a valid JSON message file of exactly `size` bytes (at least 8)
    pub fn write_messages(&self, locale: &str, size: usize) -> PathBuf {
        assert!(size >= 8, "message files need at least 8 bytes");
        let contents = format!("{{\"k\":\"{}\"}}", "a".repeat(size - 8));
        let path = self.message_path(locale);
        fs::write(&path, contents).expect("Failed to write messages");
        path
    }

    /// Config file contents for `locales`, the first one being the base locale
    pub fn config(&self, locales: &[&str]) -> I18nConfig {
        I18nConfig {
            path_pattern: PATH_PATTERN.to_string(),
            base_locale: locales[0].to_string(),
            locales: locales.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn resolve(&self, config: I18nConfig, options: &PluginOptions) -> ResolvedConfig {
        load_config(&StaticConfigProvider(config), self.root(), options)
            .expect("Failed to resolve config")
    }

    /// Resolved config with defaults for `locales`
    pub fn resolved(&self, locales: &[&str]) -> ResolvedConfig {
        self.resolve(self.config(locales), &PluginOptions::default())
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
