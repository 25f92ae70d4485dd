use anyhow::Result;
use clap::Parser;
use clip_tui::clipboard::{PollOutcome, SystemClipboard};
use clip_tui::config::Config;
use clip_tui::controller::HistoryController;
use clip_tui::schedule::Ticker;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "clipd", version)]
#[command(about = "Record clipboard text history in the background", long_about = None)]
struct Args {
    /// Milliseconds between clipboard checks
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Override the history snapshot location
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Maximum number of entries to keep
    #[arg(long)]
    max_items: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    let config = Config::load()?.with_overrides(
        args.history_file,
        args.max_items,
        args.poll_interval_ms,
    );

    let mut controller = HistoryController::open(&config, Box::new(SystemClipboard::new()))?;
    report_errors(&mut controller);

    info!(
        path = %config.history_path()?.display(),
        entries = controller.len(),
        max_items = controller.max_items(),
        interval_ms = config.poll_interval_ms,
        "Watching clipboard"
    );

    let mut ticker = Ticker::new(config.poll_interval());
    ticker.start(Instant::now());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut listening_for_shutdown = true;

    loop {
        let wait = ticker
            .time_until_due(Instant::now())
            .unwrap_or(ticker.interval());

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                if ticker.fire(Instant::now()) {
                    if controller.tick() == PollOutcome::Captured {
                        debug!(entries = controller.len(), "History updated");
                    }
                    report_errors(&mut controller);
                }
            }
            result = &mut shutdown, if listening_for_shutdown => {
                match result {
                    Ok(()) => break,
                    Err(err) => {
                        warn!(error = %err, "Failed to listen for Ctrl-C");
                        listening_for_shutdown = false;
                    }
                }
            }
        }
    }

    ticker.stop();
    info!("Stopping clipboard watcher");

    // Dropping the controller flushes any queued background save.
    drop(controller);
    Ok(())
}

fn report_errors(controller: &mut HistoryController) {
    if let Some(err) = controller.take_last_error() {
        warn!(error = %err, "Clipboard history error");
    }
}
