//! Decides whether the message compiler has to run, and runs it

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::{CacheStore, Fingerprint};
use crate::compiler::{CompileParams, MessageCompiler};
use crate::config::{OutputStructure, ResolvedConfig, Strategy, UrlPattern};
use crate::error::Result;

/// The configuration fields that change compiled output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub output_structure: OutputStructure,
    pub cookie_name: String,
    pub strategy: Vec<Strategy>,
    /// Compiler project directory, identifying which project was compiled
    pub inlang_dir: PathBuf,
    #[serde(default)]
    pub url_patterns: Vec<UrlPattern>,
}

impl From<&ResolvedConfig> for ConfigSnapshot {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            output_structure: config.output_structure,
            cookie_name: config.cookie_name.clone(),
            strategy: config.strategy.clone(),
            inlang_dir: config.project.clone(),
            url_patterns: config.url_patterns.clone(),
        }
    }
}

/// What [`ensure_compiled`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    Compiled,
    UpToDate,
}

/// Run the compiler if the cache or the output directory says it is needed
///
/// The cache is saved only after the compiler succeeds. A compiler error is
/// returned unchanged and leaves the previous record in place, so the next
/// call retries.
pub async fn ensure_compiled<M>(
    cache: &CacheStore<ConfigSnapshot>,
    compiler: &M,
    fingerprint: &Fingerprint,
    config: &ResolvedConfig,
) -> Result<CompileOutcome>
where
    M: MessageCompiler + ?Sized,
{
    let snapshot = ConfigSnapshot::from(config);

    if !cache.should_recompile(&fingerprint.hash, &snapshot, &config.outdir) {
        tracing::info!(outdir = %config.outdir.display(), "Messages up to date, skipping compilation");
        return Ok(CompileOutcome::UpToDate);
    }

    let params = CompileParams::from(config);
    tracing::info!(
        project = %params.project.display(),
        outdir = %params.outdir.display(),
        "Compiling messages"
    );
    compiler.compile(&params).await?;

    cache.save(&fingerprint.hash, &snapshot, &fingerprint.files)?;
    Ok(CompileOutcome::Compiled)
}
