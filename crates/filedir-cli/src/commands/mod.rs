//! Command implementations

mod apply;
mod module;
mod run;

pub use apply::run_apply;
pub use module::run_module;
pub use run::run_tasks;

use std::path::{Path, PathBuf};

use filedir_core::{BasePath, ReconcileOptions, Reconciler};

use crate::error::Result;

/// How a command ended, once its output has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn from_failed(failed: bool) -> Self {
        if failed { Self::Failed } else { Self::Success }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub base: BasePath,
    pub check_mode: bool,
}

impl Context {
    /// Resolve the base directory, falling back to `cwd`.
    pub fn new(cwd: &Path, base: Option<PathBuf>, check_mode: bool) -> Result<Self> {
        let base = match base {
            Some(base) if base.is_relative() => cwd.join(base),
            Some(base) => base,
            None => cwd.to_path_buf(),
        };
        Ok(Self {
            base: BasePath::canonical(&base)?,
            check_mode,
        })
    }

    pub fn reconciler(&self, check_mode: bool) -> Reconciler {
        let options = ReconcileOptions::default().check_mode(self.check_mode || check_mode);
        Reconciler::with_options(self.base.clone(), options)
    }
}
