//! The full `(desired, observed, nested)` transition matrix

use std::fs;
use std::path::Path;

use filedir_core::{DesiredState, ErrorKind, ObservedState, Reconciler, Request};
use rstest::rstest;
use tempfile::tempdir;

/// What occupies the target before reconciling.
#[derive(Debug, Clone, Copy)]
enum Fixture {
    Missing,
    MissingParent,
    RegularFile,
    Directory,
    #[cfg_attr(not(unix), allow(dead_code))]
    Symlink,
}

const TARGET: &str = "parent/target";

fn prepare(root: &Path, fixture: Fixture) {
    let parent = root.join("parent");
    let target = root.join(TARGET);
    if !matches!(fixture, Fixture::MissingParent) {
        fs::create_dir(&parent).unwrap();
    }
    match fixture {
        Fixture::Missing | Fixture::MissingParent => {}
        Fixture::RegularFile => fs::write(&target, "content").unwrap(),
        Fixture::Directory => {
            fs::create_dir(&target).unwrap();
            fs::write(target.join("child"), "content").unwrap();
        }
        Fixture::Symlink => {
            #[cfg(unix)]
            std::os::unix::fs::symlink(root.join("elsewhere"), &target).unwrap();
        }
    }
}

#[rstest]
#[case::file_missing(DesiredState::File, Fixture::Missing, false, Ok(true))]
#[case::file_missing_parent(DesiredState::File, Fixture::MissingParent, false, Err(ErrorKind::MissingParent))]
#[case::file_missing_parent_nested(DesiredState::File, Fixture::MissingParent, true, Ok(true))]
#[case::file_exists(DesiredState::File, Fixture::RegularFile, false, Ok(false))]
#[case::file_over_dir(DesiredState::File, Fixture::Directory, false, Err(ErrorKind::Conflict))]
#[case::file_over_dir_nested(DesiredState::File, Fixture::Directory, true, Err(ErrorKind::Conflict))]
#[case::dir_missing(DesiredState::Directory, Fixture::Missing, false, Ok(true))]
#[case::dir_missing_parent(DesiredState::Directory, Fixture::MissingParent, false, Err(ErrorKind::MissingParent))]
#[case::dir_missing_parent_nested(DesiredState::Directory, Fixture::MissingParent, true, Ok(true))]
#[case::dir_exists(DesiredState::Directory, Fixture::Directory, true, Ok(false))]
#[case::dir_over_file(DesiredState::Directory, Fixture::RegularFile, false, Err(ErrorKind::Conflict))]
#[case::absent_missing(DesiredState::Absent, Fixture::Missing, false, Ok(false))]
#[case::absent_missing_parent(DesiredState::Absent, Fixture::MissingParent, false, Ok(false))]
#[case::absent_file(DesiredState::Absent, Fixture::RegularFile, false, Ok(true))]
#[case::absent_tree(DesiredState::Absent, Fixture::Directory, false, Ok(true))]
#[case::absent_tree_nested(DesiredState::Absent, Fixture::Directory, true, Ok(true))]
fn transition(
    #[case] desired: DesiredState,
    #[case] fixture: Fixture,
    #[case] nested: bool,
    #[case] expected: Result<bool, ErrorKind>,
) {
    let dir = tempdir().unwrap();
    prepare(dir.path(), fixture);
    let target = dir.path().join(TARGET);
    let before = ObservedState::inspect(&target).unwrap();

    let result = Reconciler::new(dir.path())
        .reconcile(&Request::new(TARGET, desired).nested(nested))
        .map(|outcome| outcome.changed)
        .map_err(|e| e.kind());

    assert_eq!(result, expected);

    let after = ObservedState::inspect(&target).unwrap();
    if expected.is_ok() {
        assert!(after.satisfies(desired), "{after:?} does not satisfy {desired}");
    } else {
        assert_eq!(after, before, "failed reconciliation must not touch the target");
    }
}

#[rstest]
#[case::absent_tree(DesiredState::Absent, Fixture::Directory, ObservedState::Missing)]
#[case::absent_file(DesiredState::Absent, Fixture::RegularFile, ObservedState::Missing)]
#[case::directory(DesiredState::Directory, Fixture::Missing, ObservedState::Directory)]
#[case::directory_nested(DesiredState::Directory, Fixture::MissingParent, ObservedState::Directory)]
#[case::file(DesiredState::File, Fixture::Missing, ObservedState::RegularFile)]
#[case::file_nested(DesiredState::File, Fixture::MissingParent, ObservedState::RegularFile)]
fn trailing_current_dir_names_the_entry(
    #[case] desired: DesiredState,
    #[case] fixture: Fixture,
    #[case] after: ObservedState,
) {
    let dir = tempdir().unwrap();
    prepare(dir.path(), fixture);
    let reconciler = Reconciler::new(dir.path());
    let request = Request::new(format!("{TARGET}/."), desired).nested(true);

    let outcome = reconciler.reconcile(&request).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.target, dir.path().join(TARGET));
    assert_eq!(ObservedState::inspect(&dir.path().join(TARGET)).unwrap(), after);
    assert!(!reconciler.reconcile(&request).unwrap().changed);
}

#[cfg(unix)]
#[rstest]
#[case::file(DesiredState::File, ErrorKind::Conflict)]
#[case::directory(DesiredState::Directory, ErrorKind::Conflict)]
#[case::absent(DesiredState::Absent, ErrorKind::UnsupportedType)]
fn transition_from_symlink(#[case] desired: DesiredState, #[case] expected: ErrorKind) {
    let dir = tempdir().unwrap();
    prepare(dir.path(), Fixture::Symlink);

    let err = Reconciler::new(dir.path())
        .reconcile(&Request::new(TARGET, desired).nested(true))
        .unwrap_err();

    assert_eq!(err.kind(), expected);
    assert_eq!(
        ObservedState::inspect(&dir.path().join(TARGET)).unwrap(),
        ObservedState::Other
    );
}
