//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// filedir - Ensure files and directories exist, or do not
#[derive(Parser, Debug)]
#[command(name = "filedir")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory relative paths are resolved against (defaults to the current directory)
    #[arg(long, global = true, env = "FILEDIR_BASE")]
    pub base: Option<PathBuf>,

    /// Report what would change without touching the filesystem
    #[arg(long, global = true)]
    pub check: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ensure a single path is a file, a directory, or absent
    ///
    /// Examples:
    ///   filedir apply file --state file
    ///   filedir apply foo/bar/file --state file --nested
    ///   filedir apply dir --state absent
    Apply {
        /// Path to the file or directory
        path: String,

        /// Desired state: file, directory or absent
        #[arg(short, long)]
        state: String,

        /// Create missing ancestor directories
        #[arg(short, long)]
        nested: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Module-style invocation: read JSON arguments, print a JSON report
    ///
    /// The arguments file holds `path`, `state` and optionally `nested` and
    /// `_ansible_check_mode`. Use `-` to read from stdin.
    Module {
        /// Path to the JSON arguments file
        args: PathBuf,
    },

    /// Run an ordered task list (TOML, JSON or YAML), stopping at the first failure
    Run {
        /// Path to the task list
        tasks: PathBuf,

        /// Output the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}
