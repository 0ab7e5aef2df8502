use anyhow::{Context, Result};
use glossa_core::config::{ResolvedConfig, LOCALE_PLACEHOLDER};
use glossa_core::{I18nPlugin, MessageCompiler};
use notify::{Event, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::report;

const DEBOUNCE: Duration = Duration::from_millis(150);

/// Deepest directory of the message pattern without wildcards
fn watch_dir(config: &ResolvedConfig) -> PathBuf {
    let pattern = config.path_pattern.replace(LOCALE_PLACEHOLDER, "*");
    let mut dir = config.root.clone();
    for component in Path::new(&pattern).components() {
        match component {
            Component::CurDir => continue,
            Component::Normal(part) => {
                if part.to_string_lossy().contains(['*', '?', '[', '{']) {
                    break;
                }
                dir.push(part);
            }
            other => dir.push(other.as_os_str()),
        }
    }
    while !dir.is_dir() {
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return config.root.clone(),
        }
    }
    dir
}

fn touches_messages<M: MessageCompiler>(plugin: &I18nPlugin<M>, event: &Event) -> bool {
    event.paths.iter().any(|path| plugin.is_message_file(path))
}

/// Rebuild whenever a tracked message file changes; runs until the channel closes
pub fn run<M: MessageCompiler>(runtime: &Runtime, plugin: &I18nPlugin<M>) -> Result<()> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to start file watcher")?;
    let dir = watch_dir(plugin.config());
    watcher
        .watch(&dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;
    println!("Watching {} for message changes", dir.display());

    while let Ok(event) = rx.recv() {
        let mut relevant = match event {
            Ok(event) => touches_messages(plugin, &event),
            Err(e) => {
                tracing::warn!(error = %e, "File watcher error");
                false
            }
        };
        // Editors emit bursts of events for one save.
        while let Ok(event) = rx.recv_timeout(DEBOUNCE) {
            if let Ok(event) = event {
                relevant |= touches_messages(plugin, &event);
            }
        }
        if !relevant {
            continue;
        }

        match runtime.block_on(plugin.build_start()) {
            Ok(outcome) => report(outcome, plugin.config()),
            Err(e) => tracing::error!(error = %e, "Rebuild failed; keeping previous output"),
        }
    }
    Ok(())
}
