//! Reconciliation outcomes and the reports handed back to callers

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{DesiredState, Error, ErrorKind, ObservedState, Result};

/// The single mutation chosen to converge a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Already converged
    None,
    CreateFile,
    CreateDirectory,
    RemoveFile,
    /// Remove a directory and everything below it
    RemoveTree,
}

impl Action {
    pub fn is_change(self) -> bool {
        self != Self::None
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::None => "nothing to do",
            Self::CreateFile => "create file",
            Self::CreateDirectory => "create directory",
            Self::RemoveFile => "remove file",
            Self::RemoveTree => "remove directory tree",
        }
    }
}

/// One side of a [`Diff`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSide {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Before/after view of a path. States are only recorded when they differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub before: DiffSide,
    pub after: DiffSide,
}

impl Diff {
    pub fn new(path: &Path, observed: ObservedState, desired: DesiredState) -> Self {
        let path = path.display().to_string();
        let (before, after) = if observed.satisfies(desired) {
            (None, None)
        } else {
            (
                Some(observed.as_state_str().to_string()),
                Some(desired.as_str().to_string()),
            )
        };
        Self {
            before: DiffSide {
                path: path.clone(),
                state: before,
            },
            after: DiffSide { path, state: after },
        }
    }
}

/// A successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The path as requested
    pub path: PathBuf,
    /// The path resolved against the base
    pub target: PathBuf,
    pub desired: DesiredState,
    pub observed: ObservedState,
    pub action: Action,
    /// Whether the filesystem was (or in check mode, would be) mutated
    pub changed: bool,
    /// Ancestor directories created along the way, outermost first
    pub created_ancestors: Vec<PathBuf>,
    pub check_mode: bool,
    pub diff: Diff,
}

impl Outcome {
    /// Informational message for no-ops and check-mode runs.
    pub fn message(&self) -> Option<String> {
        let path = self.path.display();
        match (self.action, self.check_mode) {
            (Action::None, _) if !self.changed => Some(match self.desired {
                DesiredState::Absent => format!("{path} is already absent"),
                state => format!("{path} is already a {state}"),
            }),
            (action, true) => Some(format!("would {} {path}", action.describe())),
            _ => None,
        }
    }
}

/// The structured response of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub changed: bool,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}

impl Report {
    pub fn success(outcome: &Outcome) -> Self {
        Self {
            changed: outcome.changed,
            failed: false,
            msg: outcome.message(),
            kind: None,
            path: outcome.path.display().to_string(),
            diff: Some(outcome.diff.clone()),
        }
    }

    /// `changed` is set when the call created directories before failing.
    pub fn failure(path: &Path, error: &Error) -> Self {
        Self {
            changed: error.changed(),
            failed: true,
            msg: Some(format!("Error, {error}")),
            kind: Some(error.kind()),
            path: path.display().to_string(),
            diff: None,
        }
    }

    pub fn from_result(path: &Path, result: &Result<Outcome>) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome),
            Err(error) => Self::failure(path, error),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
