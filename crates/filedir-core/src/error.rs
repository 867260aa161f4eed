//! Error types for filedir-core

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::state::{DesiredState, ObservedState};

/// Result type for filedir-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling a path
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid state '{value}', expected one of: file, directory, absent")]
    InvalidState { value: String },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("could not create {path}: ancestor directory {missing} does not exist (set nested to create it)")]
    MissingParent { path: PathBuf, missing: PathBuf },

    #[error("could not ensure {path} is {desired}: path is {}", .observed.describe())]
    Conflict {
        path: PathBuf,
        observed: ObservedState,
        desired: DesiredState,
    },

    #[error("permission denied at {path}: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to make {path} {desired}: path is {}", .observed.describe())]
    UnsupportedType {
        path: PathBuf,
        observed: ObservedState,
        desired: DesiredState,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A failure after some ancestor directories were already created.
    /// Nothing is rolled back.
    #[error("{source} (after creating {} ancestor directories)", .created.len())]
    Incomplete {
        created: Vec<PathBuf>,
        source: Box<Error>,
    },

    #[error("Failed to read task file {path}: {source}")]
    TaskRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {format} task file at {path}: {message}")]
    TaskParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported task file format: {extension}")]
    UnsupportedFormat { extension: String },
}

/// Coarse classification of [`Error`], stable across releases and
/// reported to callers alongside the human readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    MissingParent,
    Conflict,
    Permission,
    UnsupportedType,
    Io,
    TaskFile,
}

impl Error {
    /// Wrap an I/O failure at `path`, classifying permission denials.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::Permission { path, source }
        } else {
            Self::Io { path, source }
        }
    }

    /// Attach the directories created before this error, if any.
    pub fn after_creating(self, created: Vec<PathBuf>) -> Self {
        if created.is_empty() {
            return self;
        }
        match self {
            Self::Incomplete {
                created: mut earlier,
                source,
            } => {
                earlier.extend(created);
                Self::Incomplete {
                    created: earlier,
                    source,
                }
            }
            other => Self::Incomplete {
                created,
                source: Box::new(other),
            },
        }
    }

    /// Whether the filesystem was modified before the failure.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }

    /// Directories created before the failure, outermost first.
    pub fn created(&self) -> &[PathBuf] {
        match self {
            Self::Incomplete { created, .. } => created.as_slice(),
            _ => &[],
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Incomplete { source, .. } => source.kind(),
            Self::InvalidState { .. } | Self::InvalidPath { .. } => ErrorKind::Validation,
            Self::MissingParent { .. } => ErrorKind::MissingParent,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Io { .. } => ErrorKind::Io,
            Self::TaskRead { .. } | Self::TaskParse { .. } | Self::UnsupportedFormat { .. } => {
                ErrorKind::TaskFile
            }
        }
    }
}
