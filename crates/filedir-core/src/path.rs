//! Base path handling and ancestor probing
//!
//! Request paths are interpreted relative to an explicit [`BasePath`] instead of
//! the process working directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::state::{ObservedState, is_absent};
use crate::{Error, Result};

/// The directory request paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasePath {
    root: PathBuf,
}

impl BasePath {
    /// Use `root` as given, without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Canonicalize `root` first, so reported paths are stable.
    ///
    /// Uses `dunce` to avoid `\\?\` prefixes on Windows.
    pub fn canonical(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let resolved = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
        Ok(Self { root: resolved })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path. Absolute paths are used as-is.
    ///
    /// `.` components are dropped, so `dir/.` resolves to `dir`. Paths that
    /// do not name an entry (`""`, `.`, `..`, `/`, `foo/..`) are rejected, so
    /// a reconciliation can never target the base itself or one of its
    /// ancestors.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidPath {
                path: path.to_path_buf(),
                reason: "path is empty",
            });
        }
        if !matches!(path.components().next_back(), Some(Component::Normal(_))) {
            return Err(Error::InvalidPath {
                path: path.to_path_buf(),
                reason: "path does not name a file or directory",
            });
        }
        let normalized: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        Ok(self.root.join(normalized))
    }
}

impl AsRef<Path> for BasePath {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

impl From<PathBuf> for BasePath {
    fn from(root: PathBuf) -> Self {
        Self::new(root)
    }
}

impl From<&Path> for BasePath {
    fn from(root: &Path) -> Self {
        Self::new(root)
    }
}

impl From<&str> for BasePath {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}

/// What lies above a missing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentStatus {
    /// The parent directory exists.
    Present,
    /// These ancestors are missing, outermost first.
    Missing(Vec<PathBuf>),
    /// The nearest existing ancestor is not a directory.
    Blocked {
        ancestor: PathBuf,
        observed: ObservedState,
    },
}

impl ParentStatus {
    /// Walk up from the parent of `path` to the nearest existing ancestor.
    ///
    /// Symlinks to directories count as directories here: only the final
    /// component of a request is inspected without following links.
    pub fn probe(path: &Path) -> Result<Self> {
        let mut missing = Vec::new();
        let mut current = path.parent();

        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            match fs::metadata(dir) {
                Ok(meta) if meta.is_dir() => break,
                Ok(meta) => {
                    return Ok(Self::Blocked {
                        ancestor: dir.to_path_buf(),
                        observed: ObservedState::from_file_type(meta.file_type()),
                    });
                }
                Err(e) if is_absent(&e) => {
                    // A dangling symlink is in the way, not missing
                    let observed = ObservedState::inspect(dir)?;
                    if observed.exists() {
                        return Ok(Self::Blocked {
                            ancestor: dir.to_path_buf(),
                            observed,
                        });
                    }
                    missing.push(dir.to_path_buf());
                }
                Err(e) => return Err(Error::io(dir, e)),
            }
            current = dir.parent();
        }

        if missing.is_empty() {
            Ok(Self::Present)
        } else {
            missing.reverse();
            Ok(Self::Missing(missing))
        }
    }
}
