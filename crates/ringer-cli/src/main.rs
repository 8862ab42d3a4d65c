mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{history, matching, Context};
use crate::error::{exit_code_for, report_error};
use ringer_config as config;
use ringer_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "ringer", version, about = "ringer CLI")]
struct Cli {
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
    /// Resolve an inbound phone number or email address to a contact
    Match(matching::MatchArgs),
    /// Print every key of the contact matching index
    Index(matching::IndexArgs),
    #[command(subcommand)]
    History(history::HistoryCommand),
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

    match command {
        Command::Match(args) => matching::match_address(&app_config, json, args),
        Command::Index(args) => matching::print_index(&app_config, json, args),
        Command::History(cmd) => {
            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
            debug!(path = %db_path.display(), "database path resolved");

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match cmd {
                history::HistoryCommand::Add(args) => history::add_record(&ctx, args),
                history::HistoryCommand::List(args) => history::list_records(&ctx, args),
                history::HistoryCommand::Rm(args) => history::remove_record(&ctx, args),
                history::HistoryCommand::Clear => history::clear_records(&ctx),
            }
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
