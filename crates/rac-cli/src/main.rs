//! RAC CLI - Command-line interface for logging work activities
//!
//! Records, summaries, exports and option lists from the terminal.

mod cli;
mod commands;
mod config;
mod error;


use clap::Parser;
use tracing_subscriber::filter::{Directive, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_db_path;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::summary::run_summary;
use crate::commands::taxonomy::run_taxonomy;
use crate::config::CliConfig;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "rac=info"
        .parse::<Directive>()
        .map_err(|error| CliError::Config(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add { record } => {
            let defaults = CliConfig::load().map_err(CliError::Config)?;
            run_add(&record, &defaults, &resolve_db_path(cli.db_path)?)?;
        }
        Commands::Edit {
            id,
            record,
            clear_voice_note,
        } => run_edit(&id, &record, clear_voice_note, &resolve_db_path(cli.db_path)?)?,
        Commands::Delete { id } => run_delete(&id, &resolve_db_path(cli.db_path)?)?,
        Commands::List {
            filter,
            limit,
            json,
        } => run_list(&filter, limit, json, &resolve_db_path(cli.db_path)?)?,
        Commands::Summary { filter, json } => {
            run_summary(&filter, json, &resolve_db_path(cli.db_path)?)?;
        }
        Commands::Export {
            format,
            output,
            filter,
        } => run_export(
            format,
            output.as_deref(),
            &filter,
            &resolve_db_path(cli.db_path)?,
        )?,
        Commands::Import { path } => run_import(&path, &resolve_db_path(cli.db_path)?)?,
        Commands::Taxonomy { command } => {
            run_taxonomy(&command, &resolve_db_path(cli.db_path)?)?;
        }
        Commands::Config { command } => run_config(command)?,
    }

    Ok(())
}
