mod backend;
mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{calls, charts, completions, login, Context};
use crate::error::{exit_code_for, report_error};
use callbook_config as config;

#[derive(Debug, Parser)]
#[command(name = "callbook", version, about = "callbook CLI")]
struct Cli {
    /// Use this SQLite file, ignoring the configured backend
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new call
    Add(calls::AddArgs),
    /// List calls, most recent first
    List,
    Show(calls::ShowArgs),
    Edit(calls::EditArgs),
    Delete(calls::DeleteArgs),
    /// Print chart data for the stored calls
    Chart(charts::ChartArgs),
    /// Write the HTML call report
    Report(charts::ReportArgs),
    /// Check credentials against the configured Firestore project
    Login(login::LoginArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    if let Command::Login(args) = command {
        return login::login(&app_config, json, args);
    }

    let store = backend::open_store(&app_config, db_path)?;
    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Add(args) => calls::add_call(&ctx, args),
        Command::List => calls::list_calls(&ctx),
        Command::Show(args) => calls::show_call(&ctx, args),
        Command::Edit(args) => calls::edit_call(&ctx, args),
        Command::Delete(args) => calls::delete_call(&ctx, args),
        Command::Chart(args) => charts::chart(&ctx, args),
        Command::Report(args) => charts::report(&ctx, args),
        Command::Login(_) => unreachable!("login command handled before store initialization"),
        Command::Completions(_) => {
            unreachable!("completions command handled before store initialization")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
