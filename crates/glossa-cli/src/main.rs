mod cli;
mod logging;
mod watch;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glossa_core::cache::{CacheStore, I18N_NAMESPACE};
use glossa_core::config::{
    load_config, FileConfigProvider, PluginOptions, ResolvedConfig, DEFAULT_CONFIG_FILE,
};
use glossa_core::{
    hash_files, CommandCompiler, CompileOutcome, ConfigSnapshot, I18nPlugin, ModuleHook,
    VirtualModules,
};
use std::path::PathBuf;
use std::process::ExitCode;

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ResolvedConfig> {
    let root = std::path::absolute(&cli.root)
        .with_context(|| format!("Invalid project root {}", cli.root.display()))?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config_path = if config_path.is_absolute() {
        config_path
    } else {
        root.join(config_path)
    };

    let options = PluginOptions {
        outdir: cli.outdir.clone(),
        cache_dir: cli.cache_dir.clone(),
        scope: cli.scope.clone(),
        ..Default::default()
    };
    let provider = FileConfigProvider::new(config_path);
    load_config(&provider, &root, &options).with_context(|| {
        format!(
            "Failed to load i18n config from {}",
            provider.path().display()
        )
    })
}

pub(crate) fn report(outcome: CompileOutcome, config: &ResolvedConfig) {
    match outcome {
        CompileOutcome::Compiled => {
            println!("Compiled messages into {}", config.outdir.display())
        }
        CompileOutcome::UpToDate => println!("Messages up to date"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Build {
            force,
            watch,
            compiler,
            compiler_args,
        } => {
            let compiler = match compiler {
                Some(program) => CommandCompiler::new(program).args(compiler_args),
                None => CommandCompiler::default().args(compiler_args),
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let plugin = I18nPlugin::new(config, compiler);

            let outcome = runtime.block_on(plugin.rebuild(force))?;
            report(outcome, plugin.config());

            if watch {
                watch::run(&runtime, &plugin)?;
            }
        }
        Command::Status => {
            let cache: CacheStore<ConfigSnapshot> =
                CacheStore::in_dir(&config.cache_dir, I18N_NAMESPACE);
            let fingerprint = hash_files(&config.message_glob())?;
            let snapshot = ConfigSnapshot::from(&config);
            let diff = cache.diff(&fingerprint.hash, &snapshot);

            println!("Cache:    {}", cache.path().display());
            println!("Files:    {}", fingerprint.files.len());
            println!("Hash:     {}", fingerprint.hash);
            for reason in &diff.reasons {
                println!("Changed:  {}", reason);
            }
            if cache.should_recompile(&fingerprint.hash, &snapshot, &config.outdir) {
                println!("Status:   rebuild needed");
            } else {
                println!("Status:   up to date");
            }
        }
        Command::Clean => {
            let cache: CacheStore<ConfigSnapshot> =
                CacheStore::in_dir(&config.cache_dir, I18N_NAMESPACE);
            cache.clear()?;
            println!("Cleared {}", cache.path().display());
        }
        Command::Modules { id } => {
            let modules = VirtualModules::new(config.scope.clone(), &config.outdir);
            match id {
                Some(id) => {
                    let Some(marker) = modules.resolve_id(&id) else {
                        bail!("'{}' is not a virtual module id", id);
                    };
                    let shim = modules
                        .load(&marker)
                        .with_context(|| format!("No shim registered for '{}'", id))?;
                    print!("{}", shim);
                }
                None => {
                    for id in modules.ids() {
                        println!("{}", id);
                    }
                }
            }
        }
    }
    Ok(())
}
