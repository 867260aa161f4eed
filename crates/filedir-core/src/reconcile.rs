//! The state reconciler
//!
//! Each call inspects the target, plans a single [`Action`] from the
//! `(desired, observed)` pair and applies it. Inspection and action are not
//! atomic: when the entry changes in between, the whole sequence is re-run a
//! bounded number of times.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoff;

use crate::outcome::{Action, Diff, Outcome};
use crate::path::{BasePath, ParentStatus};
use crate::state::{DesiredState, ObservedState};
use crate::{Error, Request, Result};

/// Bounds for the inspect-then-act retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(200),
        }
    }
}

impl RetryConfig {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}

/// Reconciler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Plan only; never touch the filesystem
    pub check_mode: bool,
    pub retry: RetryConfig,
}

impl ReconcileOptions {
    pub fn check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// What a single attempt decided to do.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    action: Action,
    /// Missing ancestors to create first, outermost first
    ancestors: Vec<PathBuf>,
}

impl Step {
    fn new(action: Action) -> Self {
        Self {
            action,
            ancestors: Vec::new(),
        }
    }
}

/// Converges paths below a base directory to their desired state.
#[derive(Debug, Clone)]
pub struct Reconciler {
    base: BasePath,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(base: impl Into<BasePath>) -> Self {
        Self::with_options(base, ReconcileOptions::default())
    }

    pub fn with_options(base: impl Into<BasePath>, options: ReconcileOptions) -> Self {
        Self {
            base: base.into(),
            options,
        }
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    pub fn options(&self) -> ReconcileOptions {
        self.options
    }

    /// Bring `request.path` into `request.state`.
    ///
    /// Failures abort the call without rolling back completed steps; the
    /// request can simply be re-issued. Ancestors created before a failure
    /// are reported through [`Error::created`].
    pub fn reconcile(&self, request: &Request) -> Result<Outcome> {
        let target = self.base.resolve(&request.path)?;
        let retry = self.options.retry;
        let mut attempt = 0u32;
        // Ancestors created by this call, across all attempts
        let mut created = Vec::new();

        let result = backoff::retry(retry.backoff(), || {
            attempt += 1;
            match self.attempt(request, &target, &mut created) {
                Err(Attempt::Raced(err)) if attempt < retry.max_attempts => {
                    tracing::warn!(
                        path = %target.display(),
                        attempt,
                        error = %err,
                        "Entry changed during reconciliation, retrying"
                    );
                    Err(backoff::Error::transient(err))
                }
                Err(Attempt::Raced(err) | Attempt::Failed(err)) => {
                    Err(backoff::Error::permanent(err))
                }
                Ok(outcome) => Ok(outcome),
            }
        });

        match result {
            Ok(outcome) => Ok(outcome),
            Err(backoff::Error::Permanent(err) | backoff::Error::Transient { err, .. }) => {
                Err(err.after_creating(created))
            }
        }
    }

    fn attempt(
        &self,
        request: &Request,
        target: &Path,
        created: &mut Vec<PathBuf>,
    ) -> std::result::Result<Outcome, Attempt> {
        let observed = ObservedState::inspect(target)?;
        tracing::debug!(
            path = %target.display(),
            %observed,
            desired = %request.state,
            "Inspected entry"
        );

        let step = plan(target, request.state, observed, request.nested)?;
        let check_mode = self.options.check_mode;

        if !check_mode && step.action.is_change() {
            apply(&step, target, created)?;
        }

        if step.action.is_change() {
            if check_mode {
                tracing::info!(path = %target.display(), action = ?step.action, "[check] Would apply");
            } else {
                tracing::info!(path = %target.display(), action = ?step.action, "Applied");
            }
        }

        Ok(Outcome {
            path: request.path.clone(),
            target: target.to_path_buf(),
            desired: request.state,
            observed,
            action: step.action,
            // An earlier raced attempt may have created ancestors
            changed: step.action.is_change() || !created.is_empty(),
            created_ancestors: created.clone(),
            check_mode,
            diff: Diff::new(&request.path, observed, request.state),
        })
    }
}

/// Reconcile one request below `base` with default options.
pub fn reconcile(base: &Path, request: &Request) -> Result<Outcome> {
    Reconciler::new(base).reconcile(request)
}

/// Attempt failure, split by whether a fresh inspection may succeed.
#[derive(Debug)]
enum Attempt {
    /// The entry changed between inspection and action
    Raced(Error),
    Failed(Error),
}

impl From<Error> for Attempt {
    fn from(err: Error) -> Self {
        Self::Failed(err)
    }
}

fn plan(
    target: &Path,
    desired: DesiredState,
    observed: ObservedState,
    nested: bool,
) -> Result<Step> {
    use DesiredState as D;
    use ObservedState as O;

    match (desired, observed) {
        (D::File, O::RegularFile) | (D::Directory, O::Directory) | (D::Absent, O::Missing) => {
            Ok(Step::new(Action::None))
        }
        (D::File, O::Missing) => creation(target, desired, nested, Action::CreateFile),
        (D::Directory, O::Missing) => creation(target, desired, nested, Action::CreateDirectory),
        (D::File, O::Directory | O::Other) | (D::Directory, O::RegularFile | O::Other) => {
            Err(Error::Conflict {
                path: target.to_path_buf(),
                observed,
                desired,
            })
        }
        (D::Absent, O::RegularFile) => Ok(Step::new(Action::RemoveFile)),
        (D::Absent, O::Directory) => Ok(Step::new(Action::RemoveTree)),
        (D::Absent, O::Other) => Err(Error::UnsupportedType {
            path: target.to_path_buf(),
            observed,
            desired,
        }),
    }
}

fn creation(target: &Path, desired: DesiredState, nested: bool, action: Action) -> Result<Step> {
    match ParentStatus::probe(target)? {
        ParentStatus::Present => Ok(Step::new(action)),
        ParentStatus::Missing(ancestors) if nested => Ok(Step { action, ancestors }),
        ParentStatus::Missing(ancestors) => Err(Error::MissingParent {
            path: target.to_path_buf(),
            missing: ancestors.into_iter().next().unwrap_or_default(),
        }),
        ParentStatus::Blocked { ancestor, observed } => {
            tracing::debug!(path = %target.display(), ancestor = %ancestor.display(), %desired, "Ancestor blocks creation");
            Err(Error::Conflict {
                path: ancestor,
                observed,
                desired: DesiredState::Directory,
            })
        }
    }
}

/// Perform `step`, recording every ancestor created in `created`.
fn apply(
    step: &Step,
    target: &Path,
    created: &mut Vec<PathBuf>,
) -> std::result::Result<(), Attempt> {
    for dir in &step.ancestors {
        match fs::create_dir(dir) {
            Ok(()) => {
                tracing::debug!(path = %dir.display(), "Created ancestor directory");
                created.push(dir.clone());
            }
            // Someone else created it meanwhile
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(e) => return Err(classify(step.action, dir, e)),
        }
    }

    let result = match step.action {
        Action::None => Ok(()),
        Action::CreateFile => OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(target)
            .map(drop),
        Action::CreateDirectory => fs::create_dir(target),
        Action::RemoveFile => fs::remove_file(target),
        Action::RemoveTree => fs::remove_dir_all(target),
    };
    result.map_err(|e| classify(step.action, target, e))
}

fn classify(action: Action, path: &Path, err: io::Error) -> Attempt {
    let raced = match action {
        Action::CreateFile | Action::CreateDirectory => matches!(
            err.kind(),
            io::ErrorKind::AlreadyExists | io::ErrorKind::NotFound
        ),
        Action::RemoveFile => err.kind() == io::ErrorKind::NotFound,
        Action::RemoveTree => matches!(
            err.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::DirectoryNotEmpty | io::ErrorKind::NotADirectory
        ),
        Action::None => false,
    };
    let err = Error::io(path, err);
    if raced {
        Attempt::Raced(err)
    } else {
        Attempt::Failed(err)
    }
}
