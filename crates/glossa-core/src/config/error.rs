use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Config must list at least one locale")]
    NoLocales,

    #[error("Base locale '{base_locale}' is not one of the configured locales [{locales}]")]
    UnknownBaseLocale {
        base_locale: String,
        locales: String,
    },

    #[error("Config field '{0}' must not be empty")]
    EmptyField(&'static str),
}
