//! Desired and observed entry states

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The entry type a caller wants to find at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// A regular file (created empty when missing)
    File,
    /// A directory
    Directory,
    /// Nothing at all
    Absent,
}

impl DesiredState {
    /// Every accepted state, in wire order.
    pub const ALL: [DesiredState; 3] = [Self::File, Self::Directory, Self::Absent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Absent => "absent",
        }
    }
}

impl FromStr for DesiredState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::InvalidState {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entry type currently occupying a path.
///
/// Symlinks are never followed, so a link to a directory is [`ObservedState::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedState {
    Missing,
    RegularFile,
    Directory,
    /// Symlinks, sockets, FIFOs and device nodes
    Other,
}

impl ObservedState {
    /// Inspect `path` without following symlinks.
    ///
    /// A path below a regular file (`ENOTDIR`) is reported as missing.
    pub fn inspect(path: &Path) -> Result<Self> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Ok(Self::from_file_type(meta.file_type())),
            Err(e) if is_absent(&e) => Ok(Self::Missing),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            Self::RegularFile
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }

    pub fn exists(self) -> bool {
        self != Self::Missing
    }

    /// Whether this entry already is what `desired` asks for.
    pub fn satisfies(self, desired: DesiredState) -> bool {
        matches!(
            (desired, self),
            (DesiredState::File, Self::RegularFile)
                | (DesiredState::Directory, Self::Directory)
                | (DesiredState::Absent, Self::Missing)
        )
    }

    /// Name of the state in the vocabulary used by diffs.
    pub fn as_state_str(self) -> &'static str {
        match self {
            Self::Missing => "absent",
            Self::RegularFile => "file",
            Self::Directory => "directory",
            Self::Other => "other",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::RegularFile => "a regular file",
            Self::Directory => "a directory",
            Self::Other => "a symlink or special file",
        }
    }
}

impl fmt::Display for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_state_str())
    }
}

/// Errors meaning "nothing is there" rather than "could not look".
pub(crate) fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_known_states() {
        assert_eq!("file".parse::<DesiredState>().unwrap(), DesiredState::File);
        assert_eq!(
            "directory".parse::<DesiredState>().unwrap(),
            DesiredState::Directory
        );
        assert_eq!("absent".parse::<DesiredState>().unwrap(), DesiredState::Absent);
    }

    #[test]
    fn rejects_unknown_state() {
        let err = "link".parse::<DesiredState>().unwrap_err();
        assert!(matches!(err, Error::InvalidState { ref value } if value == "link"));
        // Matching is exact
        assert!("File".parse::<DesiredState>().is_err());
    }

    #[test]
    fn inspect_classifies_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();

        assert_eq!(ObservedState::inspect(dir.path()).unwrap(), ObservedState::Directory);
        assert_eq!(ObservedState::inspect(&file).unwrap(), ObservedState::RegularFile);
        assert_eq!(
            ObservedState::inspect(&dir.path().join("nope")).unwrap(),
            ObservedState::Missing
        );
        // Below a regular file
        assert_eq!(
            ObservedState::inspect(&file.join("child")).unwrap(),
            ObservedState::Missing
        );
    }

    #[cfg(unix)]
    #[test]
    fn inspect_does_not_follow_symlinks() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(ObservedState::inspect(&link).unwrap(), ObservedState::Other);
    }

    #[test]
    fn satisfies_matches_only_equivalent_states() {
        assert!(ObservedState::Missing.satisfies(DesiredState::Absent));
        assert!(ObservedState::Directory.satisfies(DesiredState::Directory));
        assert!(!ObservedState::Other.satisfies(DesiredState::File));
        assert!(!ObservedState::Other.satisfies(DesiredState::Absent));
    }
}
