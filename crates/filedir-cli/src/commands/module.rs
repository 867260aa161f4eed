//! The `module` command: JSON arguments in, JSON report out

use std::fs;
use std::io::Read;
use std::path::Path;

use filedir_core::{ErrorKind, ModuleArgs, Report, Request};
use serde::Deserialize;

use super::{Context, Status};
use crate::error::Result;

/// Arguments as passed by an automation host.
#[derive(Debug, Deserialize)]
struct Invocation {
    path: String,
    state: String,
    #[serde(default)]
    nested: bool,
    #[serde(default, rename = "_ansible_check_mode")]
    check_mode: bool,
}

pub fn run_module(ctx: &Context, args_file: &Path) -> Result<Status> {
    let raw = if args_file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(args_file)?
    };

    let report = invoke(ctx, &raw);
    println!("{}", report.to_json()?);
    Ok(Status::from_failed(report.failed))
}

fn invoke(ctx: &Context, raw: &str) -> Report {
    let invocation: Invocation = match serde_json::from_str(raw) {
        Ok(invocation) => invocation,
        Err(e) => {
            return Report {
                changed: false,
                failed: true,
                msg: Some(format!("Error, invalid module arguments: {e}")),
                kind: Some(ErrorKind::Validation),
                path: String::new(),
                diff: None,
            };
        }
    };

    let reconciler = ctx.reconciler(invocation.check_mode);
    let path = invocation.path.clone();
    let args = ModuleArgs {
        path: invocation.path,
        state: invocation.state,
        nested: invocation.nested,
    };
    let result = Request::try_from(args).and_then(|request| reconciler.reconcile(&request));
    Report::from_result(Path::new(&path), &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(temp_dir: &TempDir) -> Context {
        Context::new(temp_dir.path(), None, false).unwrap()
    }

    #[test]
    fn test_invoke_creates_directory() {
        let temp_dir = TempDir::new().unwrap();

        let report = invoke(&context(&temp_dir), r#"{"path": "dir", "state": "directory"}"#);

        assert!(report.changed);
        assert!(!report.failed);
        assert!(temp_dir.path().join("dir").is_dir());
    }

    #[test]
    fn test_invoke_honours_check_mode() {
        let temp_dir = TempDir::new().unwrap();

        let report = invoke(
            &context(&temp_dir),
            r#"{"path": "dir", "state": "directory", "_ansible_check_mode": true}"#,
        );

        assert!(report.changed);
        assert!(!temp_dir.path().join("dir").exists());
    }

    #[test]
    fn test_invoke_rejects_malformed_arguments() {
        let temp_dir = TempDir::new().unwrap();

        let report = invoke(&context(&temp_dir), r#"{"state": "file"}"#);

        assert!(report.failed);
        assert_eq!(report.kind, Some(ErrorKind::Validation));
    }
}
