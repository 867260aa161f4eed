//! The `run` command

use std::path::Path;

use colored::Colorize;
use filedir_core::TaskList;

use super::apply::render;
use super::{Context, Status};
use crate::error::Result;

pub fn run_tasks(ctx: &Context, tasks_file: &Path, json: bool) -> Result<Status> {
    let list = TaskList::load(tasks_file)?;
    tracing::debug!(count = list.tasks.len(), file = %tasks_file.display(), "Loaded task list");

    let summary = ctx.reconciler(false).run_tasks(&list);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for run in &summary.runs {
            println!("{} {}", format!("[{}]", run.name).bold(), render(&run.report));
        }
        println!(
            "ok={} changed={} failed={} skipped={}",
            summary.ok, summary.changed, summary.failed, summary.skipped
        );
    }
    Ok(Status::from_failed(!summary.success()))
}
