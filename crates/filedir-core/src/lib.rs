//! Declarative file and directory state reconciliation
//!
//! Given a path and a desired state (`file`, `directory` or `absent`), the
//! [`Reconciler`] inspects what is there, performs the minimal mutation needed
//! and reports whether anything changed.
//!
//! ```no_run
//! use filedir_core::{Reconciler, Request};
//!
//! let reconciler = Reconciler::new("/srv/data");
//! let outcome = reconciler.reconcile(&Request::file("foo/bar/file").nested(true))?;
//! assert!(outcome.changed);
//! # Ok::<(), filedir_core::Error>(())
//! ```

pub mod error;
pub mod outcome;
pub mod path;
pub mod reconcile;
pub mod request;
pub mod state;
pub mod tasks;

pub use error::{Error, ErrorKind, Result};
pub use outcome::{Action, Diff, DiffSide, Outcome, Report};
pub use path::{BasePath, ParentStatus};
pub use reconcile::{ReconcileOptions, Reconciler, RetryConfig, reconcile};
pub use request::{ModuleArgs, Request};
pub use state::{DesiredState, ObservedState};
pub use tasks::{RunSummary, Task, TaskFormat, TaskList, TaskRun};
