use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "glossa", version, about = "Incremental i18n message compilation")]
pub struct Cli {
    /// Project root; relative paths in the config are resolved against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (YAML or JSON), relative to the project root
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the compiled output directory
    #[arg(long, global = true)]
    pub outdir: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Package scope for virtual module ids
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile messages if the cache says they changed
    Build {
        /// Discard the cache before building
        #[arg(long)]
        force: bool,

        /// Keep running and rebuild when message files change
        #[arg(long)]
        watch: bool,

        /// Message compiler executable
        #[arg(long)]
        compiler: Option<String>,

        /// Argument passed to the compiler before --project/--outdir (repeatable)
        #[arg(long = "compiler-arg", allow_hyphen_values = true)]
        compiler_args: Vec<String>,
    },

    /// Show whether the next build would recompile, and why
    Status,

    /// Delete the i18n cache record
    Clean,

    /// List virtual module ids, or print the shim served for one
    Modules {
        /// Virtual module id to resolve and load
        id: Option<String>,
    },
}
