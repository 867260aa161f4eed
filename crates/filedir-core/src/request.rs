//! Reconciliation requests

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{DesiredState, Error, Result};

/// A validated request to bring one path into a desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Location relative to the reconciler's base path
    pub path: PathBuf,
    pub state: DesiredState,
    /// Allow creating missing ancestor directories
    pub nested: bool,
}

impl Request {
    pub fn new(path: impl Into<PathBuf>, state: DesiredState) -> Self {
        Self {
            path: path.into(),
            state,
            nested: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DesiredState::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DesiredState::Directory)
    }

    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DesiredState::Absent)
    }

    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }
}

/// Untyped request parameters as they arrive from a caller.
///
/// `state` stays a plain string here so an unknown value surfaces as a
/// validation error in the report rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleArgs {
    pub path: String,
    pub state: String,
    #[serde(default)]
    pub nested: bool,
}

impl TryFrom<ModuleArgs> for Request {
    type Error = Error;

    fn try_from(args: ModuleArgs) -> Result<Self> {
        let state = args.state.parse::<DesiredState>()?;
        if args.path.is_empty() {
            return Err(Error::InvalidPath {
                path: PathBuf::new(),
                reason: "path is empty",
            });
        }
        Ok(Self::new(args.path, state).nested(args.nested))
    }
}
