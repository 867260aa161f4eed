//! filedir CLI
//!
//! Brings paths into a declared state: a regular file, a directory, or absent.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `info`)
//! - `FILEDIR_BASE`: Directory relative paths are resolved against
//!
//! Reports go to stdout, logs to stderr.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::{Context, Status};
use error::Result;

fn main() {
    match run() {
        Ok(Status::Success) => {}
        Ok(Status::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<Status> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} filedir", "filedir".green().bold());
        println!();
        println!("Run {} for available commands.", "filedir --help".cyan());
        return Ok(Status::Success);
    };

    let cwd = std::env::current_dir()?;
    let ctx = Context::new(&cwd, cli.base, cli.check)?;
    tracing::debug!(base = %ctx.base.root().display(), check = ctx.check_mode, "Resolved base directory");

    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<Status> {
    match cmd {
        Commands::Apply {
            path,
            state,
            nested,
            json,
        } => commands::run_apply(ctx, &path, &state, nested, json),
        Commands::Module { args } => commands::run_module(ctx, &args),
        Commands::Run { tasks, json } => commands::run_tasks(ctx, &tasks, json),
    }
}
