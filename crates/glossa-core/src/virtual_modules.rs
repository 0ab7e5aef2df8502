//! Virtual modules served to the host bundler
//!
//! A consuming application imports `<scope>/i18n/runtime`, `<scope>/i18n/server`
//! or `<scope>/i18n/messages`. Each resolves to a `\0`-prefixed marker id that
//! bundlers treat as virtual, and loads as a shim re-exporting the compiled
//! file from the output directory.

use rustc_hash::FxHashMap;
use std::path::Path;

/// Prefix marking an id as virtual so no other resolver touches it
pub const VIRTUAL_PREFIX: &str = "\0";

/// Side-effect import every shim carries; the compiled URL strategy relies on
/// `URLPattern`, which not every runtime provides.
pub const RUNTIME_POLYFILL: &str = "urlpattern-polyfill";

/// Resolve/load hook pair a bundler adapter calls into
pub trait ModuleHook {
    /// Claim `id` by returning its internal id, or defer with `None`
    fn resolve_id(&self, id: &str) -> Option<String>;

    /// Source text for an internal id returned by [`ModuleHook::resolve_id`]
    fn load(&self, id: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualModule {
    Runtime,
    Server,
    Messages,
}

impl VirtualModule {
    pub const ALL: [VirtualModule; 3] = [
        VirtualModule::Runtime,
        VirtualModule::Server,
        VirtualModule::Messages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VirtualModule::Runtime => "runtime",
            VirtualModule::Server => "server",
            VirtualModule::Messages => "messages",
        }
    }

    /// Compiled file the shim re-exports
    pub fn backing_file(self) -> &'static str {
        match self {
            VirtualModule::Runtime => "runtime.js",
            VirtualModule::Server => "server.js",
            VirtualModule::Messages => "messages.js",
        }
    }

    /// Public id, e.g. `@repo/i18n/runtime`
    pub fn id(self, scope: &str) -> String {
        format!("{}/i18n/{}", scope, self.name())
    }
}

/// Closed registry of the three virtual modules for one output directory
#[derive(Debug, Clone)]
pub struct VirtualModules {
    scope: String,
    resolved: FxHashMap<String, String>,
    shims: FxHashMap<String, String>,
}

impl VirtualModules {
    pub fn new(scope: impl Into<String>, outdir: &Path) -> Self {
        let scope = scope.into();
        let mut resolved = FxHashMap::default();
        let mut shims = FxHashMap::default();

        for module in VirtualModule::ALL {
            let id = module.id(&scope);
            let marker = format!("{}{}", VIRTUAL_PREFIX, id);
            shims.insert(marker.clone(), shim_source(&outdir.join(module.backing_file())));
            resolved.insert(id, marker);
        }

        Self {
            scope,
            resolved,
            shims,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Public ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = String> + '_ {
        VirtualModule::ALL
            .into_iter()
            .map(move |module| module.id(&self.scope))
    }
}

impl ModuleHook for VirtualModules {
    fn resolve_id(&self, id: &str) -> Option<String> {
        self.resolved.get(id).cloned()
    }

    fn load(&self, id: &str) -> Option<&str> {
        self.shims.get(id).map(String::as_str)
    }
}

fn shim_source(target: &Path) -> String {
    let target = target.to_string_lossy().replace('\\', "/");
    // JSON string literals are valid JavaScript string literals.
    let specifier = serde_json::Value::String(target).to_string();
    format!(
        "import \"{}\";\nexport * from {};\n",
        RUNTIME_POLYFILL, specifier
    )
}
