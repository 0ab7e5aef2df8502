use thiserror::Error;

use crate::cache::CacheError;
use crate::compiler::CompileError;
use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, GlossaError>;

#[derive(Debug, Error)]
pub enum GlossaError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
