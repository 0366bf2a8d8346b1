use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, debug, info};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod config;

use cli::{Action, Cli};
use config::Config;
use todo::TodoError;
use todo::render::{self, ColorMode};
use todo::store::TodoStore;

/// Filter precedence: `-v`, then `log_level` from config, then `RUST_LOG`.
fn log_builder(verbose: bool, log_level: Option<&str>, env_filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    if let Some(filters) = env_filter {
        builder.parse_filters(filters);
    }
    if let Some(level) = log_level {
        builder.parse_filters(level);
    }
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None);
    builder
}

fn setup_logging(verbose: bool, log_level: Option<&str>) {
    // Logs go to stderr so they never interleave with the list on stdout
    let env_filter = std::env::var("RUST_LOG").ok();
    log_builder(verbose, log_level, env_filter.as_deref()).init();
}

/// Basename of the invoked executable; the default todo file is named after it.
fn program_name() -> String {
    program_name_from(std::env::args_os().next().as_deref())
}

fn program_name_from(arg0: Option<&OsStr>) -> String {
    arg0.map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn run_application(action: Action, cli: &Cli, config: &Config) -> Result<()> {
    let path = config.todo_path(cli.file.as_ref(), &program_name())?;
    info!("Using todo file: {}", path.display());

    let store = TodoStore::new(&path);
    match action {
        Action::List => handle_list_command(&store, config.padding, config.color_mode(cli.color)),
        Action::Add(text) => handle_add_command(&store, &text, cli.is_verbose()),
        Action::Delete(index) => handle_delete_command(&store, index, cli.is_verbose()),
        Action::Edit(index, text) => handle_edit_command(&store, index, &text, cli.is_verbose()),
    }
}

fn handle_list_command(store: &TodoStore, padding: usize, color: ColorMode) -> Result<()> {
    match color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let entries = store.list()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let count = render::write_entries(&mut out, entries, padding, color.should_use_colors())?;
    debug!("Listed {} entries", count);
    Ok(())
}

fn handle_add_command(store: &TodoStore, text: &str, verbose: bool) -> Result<()> {
    store.append(text)?;
    if verbose {
        println!("{} {}", "Added:".green(), text);
    }
    Ok(())
}

fn handle_delete_command(store: &TodoStore, index: usize, verbose: bool) -> Result<()> {
    let removed = store.delete(index)?;
    if verbose {
        println!("{} {}", "Deleted:".red(), removed);
    }
    Ok(())
}

fn handle_edit_command(store: &TodoStore, index: usize, text: &str, verbose: bool) -> Result<()> {
    let previous = store.edit(index, text)?;
    if verbose {
        println!("{} {} -> {}", "Edited:".yellow(), previous, text);
    }
    Ok(())
}

fn report_error(err: &eyre::Report) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    if err.downcast_ref::<TodoError>().is_some_and(TodoError::is_usage) {
        eprintln!("\n{}", Cli::command().render_usage());
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments; clap prints its own usage for malformed input
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let result = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")
        .and_then(|config| {
            setup_logging(cli.is_verbose(), config.log_level.as_deref());
            info!("Starting with config from: {:?}", cli.config);
            let action = cli.action()?;
            run_application(action, &cli, &config)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
