//! Seam to the external message compiler
//!
//! Glossa never generates runtime code itself; it hands a [`CompileParams`]
//! to a [`MessageCompiler`] and expects `runtime.js`, `server.js` and
//! `messages.js` under the output directory afterwards.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::{OutputStructure, ResolvedConfig, Strategy, UrlPattern};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Failed to start message compiler '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Message compiler exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Failed to encode compiler parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Everything the compiler needs for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileParams {
    pub project: PathBuf,
    pub outdir: PathBuf,
    pub output_structure: OutputStructure,
    pub cookie_name: String,
    pub strategy: Vec<Strategy>,
    pub url_patterns: Vec<UrlPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl From<&ResolvedConfig> for CompileParams {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            project: config.project.clone(),
            outdir: config.outdir.clone(),
            output_structure: config.output_structure,
            cookie_name: config.cookie_name.clone(),
            strategy: config.strategy.clone(),
            url_patterns: config.url_patterns.clone(),
            project_id: config.project_id.clone(),
        }
    }
}

#[async_trait]
pub trait MessageCompiler: Send + Sync {
    async fn compile(&self, params: &CompileParams) -> Result<(), CompileError>;
}

/// Runs an external compiler process
///
/// The process receives `--project <dir> --outdir <dir>` after the configured
/// arguments and the full [`CompileParams`] as JSON on stdin.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Default for CommandCompiler {
    fn default() -> Self {
        CommandCompiler::new("npx").args(["@inlang/paraglide-js", "compile"])
    }
}

#[async_trait]
impl MessageCompiler for CommandCompiler {
    async fn compile(&self, params: &CompileParams) -> Result<(), CompileError> {
        let input = serde_json::to_vec(params)?;
        let spawn_error = |source| CompileError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--project")
            .arg(&params.project)
            .arg("--outdir")
            .arg(&params.outdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A compiler that ignores stdin may close it early.
            if let Err(e) = stdin.write_all(&input).await {
                tracing::debug!(error = %e, "Compiler did not read parameters from stdin");
            }
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
