//! The `apply` command

use std::path::Path;

use colored::Colorize;
use filedir_core::{ModuleArgs, Report, Request};

use super::{Context, Status};
use crate::error::Result;

pub fn run_apply(ctx: &Context, path: &str, state: &str, nested: bool, json: bool) -> Result<Status> {
    let args = ModuleArgs {
        path: path.to_string(),
        state: state.to_string(),
        nested,
    };
    let result = Request::try_from(args).and_then(|request| ctx.reconciler(false).reconcile(&request));
    let report = Report::from_result(Path::new(path), &result);

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", render(&report));
    }
    Ok(Status::from_failed(report.failed))
}

/// One-line human rendering of a report.
pub(crate) fn render(report: &Report) -> String {
    let detail = report.msg.clone().unwrap_or_else(|| report.path.clone());
    if report.failed {
        format!("{}: {}", "failed".red().bold(), detail)
    } else if report.changed {
        format!("{}: {}", "changed".yellow().bold(), detail)
    } else {
        format!("{}: {}", "ok".green().bold(), detail)
    }
}
