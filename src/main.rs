mod app;
mod cli;
mod ui;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands, Target};
use clip_tui::clipboard::SystemClipboard;
use clip_tui::config::Config;
use clip_tui::controller::HistoryController;
use clip_tui::utils::paths::{ensure_directories_exist, get_config_path, get_log_dir};
use clip_tui::utils::text::preview_line;
use std::io::{self, Write};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};
use ui::theme::Theme;

const LIST_PREVIEW_WIDTH: usize = 60;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_overrides(cli.history_file, cli.max_items, None);

    match cli.command {
        Some(command) => {
            init_stderr_logging();

            match command {
                Commands::List { query, limit, json } => {
                    let controller = open_read_only(&config)?;
                    handle_list(&controller, query.as_deref().unwrap_or(""), limit, json)?
                }
                Commands::Copy { target } => handle_copy(&mut open_read_only(&config)?, target)?,
                Commands::Delete { target } => {
                    handle_delete(&mut open_for_update(&config)?, target)?
                }
                Commands::Clear { yes } => handle_clear(&mut open_for_update(&config)?, yes)?,
                Commands::Path => handle_path(&config)?,
            }
        }
        None => {
            ensure_directories_exist()?;
            let _log_guard = init_file_logging();

            let controller = open_controller(&config)?;
            let theme = Theme::from_config(&config);
            let state = app::AppState::new(controller, theme, config.poll_interval());

            ui::run_tui(state)?;
        }
    }

    Ok(())
}

fn open_controller(config: &Config) -> Result<HistoryController> {
    HistoryController::open(config, Box::new(SystemClipboard::new()))
}

/// For commands that only read the history: the snapshot on disk is never rewritten.
fn open_read_only(config: &Config) -> Result<HistoryController> {
    let mut controller =
        HistoryController::open_read_only(config, Box::new(SystemClipboard::new()))?;
    // The store already logged any load problem.
    controller.take_last_error();
    Ok(controller)
}

fn open_for_update(config: &Config) -> Result<HistoryController> {
    let mut controller = open_controller(config)?;
    controller.take_last_error();
    Ok(controller)
}

fn init_stderr_logging() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// The terminal belongs to the UI, so interactive sessions log to a file.
fn init_file_logging() -> Option<WorkerGuard> {
    let log_dir = get_log_dir().ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, "clip-tui.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Surface a persistence problem the store absorbed, failing the command.
fn check_last_error(controller: &mut HistoryController) -> Result<()> {
    match controller.take_last_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn handle_list(
    controller: &HistoryController,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    // Positions refer to the full history so they stay valid for `copy`/`delete`.
    let all = controller.visible_entries("");
    let matching = controller.visible_entries(query);
    let limit = limit.unwrap_or(usize::MAX);

    if json {
        let shown: Vec<_> = matching.into_iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if matching.is_empty() {
        if query.is_empty() {
            println!("Clipboard history is empty.");
        } else {
            println!("No entries match \"{query}\".");
        }
        return Ok(());
    }

    for entry in matching.into_iter().take(limit) {
        let position = all
            .iter()
            .position(|candidate| candidate.id() == entry.id())
            .map_or(0, |index| index + 1);
        println!(
            "{:>3}  {}  {}  {}",
            position,
            entry.short_id(),
            entry.created_at().with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            preview_line(entry.text(), LIST_PREVIEW_WIDTH)
        );
    }

    Ok(())
}

fn handle_copy(controller: &mut HistoryController, target: Target) -> Result<()> {
    let Some(id) = target.resolve(&controller.visible_entries("")) else {
        bail!("No history entry matches {target}");
    };

    controller.copy(id)?;
    println!("✓ Copied entry to clipboard");
    Ok(())
}

fn handle_delete(controller: &mut HistoryController, target: Target) -> Result<()> {
    let Some(id) = target.resolve(&controller.visible_entries("")) else {
        bail!("No history entry matches {target}");
    };

    controller.delete(id);
    check_last_error(controller)?;
    println!("✓ Entry deleted");
    Ok(())
}

fn handle_clear(controller: &mut HistoryController, yes: bool) -> Result<()> {
    if controller.is_empty() {
        println!("Clipboard history is already empty.");
        return Ok(());
    }

    if !yes && !confirm(&format!("Delete all {} entries? (y/N): ", controller.len()))? {
        println!("Aborted.");
        return Ok(());
    }

    controller.clear_all();
    check_last_error(controller)?;
    println!("✓ History cleared");
    Ok(())
}

fn handle_path(config: &Config) -> Result<()> {
    println!("history: {}", config.history_path()?.display());
    println!("config:  {}", get_config_path()?.display());
    println!("log:     {}", get_log_dir()?.join("clip-tui.log").display());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read confirmation")?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
