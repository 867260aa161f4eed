//! Ordered task lists
//!
//! A task list is a sequence of requests applied one after another, stopping at
//! the first failure. Lists can be written as TOML, JSON or YAML; the format is
//! detected from the file extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::outcome::Report;
use crate::reconcile::Reconciler;
use crate::request::{ModuleArgs, Request};
use crate::{Error, Result};

/// One entry of a task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: String,
    pub state: String,
    #[serde(default)]
    pub nested: bool,
}

impl Task {
    /// Display name, falling back to `"<state> <path>"`.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.state, self.path))
    }

    pub fn args(&self) -> ModuleArgs {
        ModuleArgs {
            path: self.path.clone(),
            state: self.state.clone(),
            nested: self.nested,
        }
    }
}

/// Supported task list encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormat {
    Toml,
    Json,
    Yaml,
}

impl TaskFormat {
    /// Detect the format from a file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// A parsed task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Load a task list from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let format = TaskFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| Error::TaskRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format, path)
    }

    /// Parse task list text. `origin` is only used in error messages.
    pub fn parse(content: &str, format: TaskFormat, origin: &Path) -> Result<Self> {
        let parsed: std::result::Result<Self, String> = match format {
            TaskFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            TaskFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            TaskFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::TaskParse {
            path: origin.to_path_buf(),
            format: format.name().into(),
            message,
        })
    }
}

/// Result of one task in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRun {
    pub name: String,
    pub report: Report,
}

/// Aggregate of a task list run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Tasks that succeeded, changed or not
    pub ok: usize,
    pub changed: usize,
    pub failed: usize,
    /// Tasks not attempted after a failure
    pub skipped: usize,
    pub runs: Vec<TaskRun>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl Reconciler {
    /// Run every task in order, stopping at the first failure.
    pub fn run_tasks(&self, list: &TaskList) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, task) in list.tasks.iter().enumerate() {
            let name = task.label();
            let _span = tracing::info_span!("task", %name).entered();

            let result = Request::try_from(task.args()).and_then(|req| self.reconcile(&req));
            let report = Report::from_result(&PathBuf::from(&task.path), &result);

            if report.failed {
                summary.failed += 1;
                summary.skipped = list.tasks.len() - index - 1;
                tracing::warn!(msg = report.msg.as_deref().unwrap_or_default(), "Task failed");
                summary.runs.push(TaskRun { name, report });
                break;
            }

            summary.ok += 1;
            if report.changed {
                summary.changed += 1;
            }
            summary.runs.push(TaskRun { name, report });
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(TaskFormat::from_path(Path::new("a.toml")).unwrap(), TaskFormat::Toml);
        assert_eq!(TaskFormat::from_path(Path::new("a.JSON")).unwrap(), TaskFormat::Json);
        assert_eq!(TaskFormat::from_path(Path::new("a.yml")).unwrap(), TaskFormat::Yaml);
        assert!(matches!(
            TaskFormat::from_path(Path::new("a.ini")),
            Err(Error::UnsupportedFormat { extension }) if extension == "ini"
        ));
    }

    #[test]
    fn parses_toml_tasks() {
        let content = r#"
[[tasks]]
name = "create file"
path = "file"
state = "file"

[[tasks]]
path = "foo/bar/file"
state = "file"
nested = true
"#;
        let list = TaskList::parse(content, TaskFormat::Toml, Path::new("tasks.toml")).unwrap();
        assert_eq!(list.tasks.len(), 2);
        assert_eq!(list.tasks[0].label(), "create file");
        assert_eq!(list.tasks[1].label(), "file foo/bar/file");
        assert!(list.tasks[1].nested);
    }

    #[test]
    fn reports_parse_errors_with_format() {
        let err = TaskList::parse("tasks: [", TaskFormat::Yaml, Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, Error::TaskParse { ref format, .. } if format == "YAML"));
    }
}
