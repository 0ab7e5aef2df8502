//! Recording stand-in for the external message compiler

use async_trait::async_trait;
use glossa_core::compiler::{CompileError, CompileParams, MessageCompiler};
use glossa_core::virtual_modules::VirtualModule;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Counts invocations and writes placeholder artifacts into the output directory
#[derive(Debug, Default)]
pub struct MockCompiler {
    calls: AtomicUsize,
    fail: AtomicBool,
    skip_outputs: AtomicBool,
    last_params: Mutex<Option<CompileParams>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `compile` was called, including failed calls
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make subsequent calls fail without writing anything
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Succeed without producing output files
    pub fn set_skip_outputs(&self, skip: bool) {
        self.skip_outputs.store(skip, Ordering::SeqCst);
    }

    pub fn last_params(&self) -> Option<CompileParams> {
        self.last_params.lock().clone()
    }
}

#[async_trait]
impl MessageCompiler for MockCompiler {
    async fn compile(&self, params: &CompileParams) -> Result<(), CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock() = Some(params.clone());

        if self.fail.load(Ordering::SeqCst) {
            return Err(CompileError::Other("mock compiler failure".to_string()));
        }
        if self.skip_outputs.load(Ordering::SeqCst) {
            return Ok(());
        }

        tokio::fs::create_dir_all(&params.outdir)
            .await
            .map_err(|e| CompileError::Other(e.to_string()))?;
        for module in VirtualModule::ALL {
            let contents = format!("// compiled {}\nexport {{}};\n", module.name());
            tokio::fs::write(params.outdir.join(module.backing_file()), contents)
                .await
                .map_err(|e| CompileError::Other(e.to_string()))?;
        }
        Ok(())
    }
}
