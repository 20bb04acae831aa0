//! Goalsync CLI - replay proof-assistant notification recordings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use goalsync_core::{map_offset, GoalSnapshot, Notification};
use goalsync_watcher::{ChannelSink, GoalWatcher, WatcherConfig, WatcherHandle};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goalsync")]
#[command(about = "Consolidate proof-assistant notifications into goal snapshots", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines notification recording and print each snapshot
    Replay {
        /// Recording file, or `-` for stdin
        file: PathBuf,
        /// Watcher configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print snapshots
        #[arg(long)]
        pretty: bool,
    },
    /// Print `line:column` of a code-point offset in a file
    Locate {
        /// Source file
        file: PathBuf,
        /// Code-point offset
        offset: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay { file, config, pretty } => {
            let config = match config {
                Some(path) => load_config(&path).await?,
                None => WatcherConfig::default(),
            };
            replay(&file, config, pretty).await?;
        }
        Commands::Locate { file, offset } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let position = locate_in(&text, offset)
                .with_context(|| format!("Cannot locate offset in {}", file.display()))?;
            println!("{}", position);
        }
    }

    Ok(())
}

async fn load_config(path: &Path) -> Result<WatcherConfig> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

async fn replay(file: &Path, config: WatcherConfig, pretty: bool) -> Result<()> {
    let (sink, mut snapshots) = ChannelSink::channel();
    let handle = WatcherHandle::spawn(GoalWatcher::new().with_config(config).with_sink(sink));

    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        while let Some(snapshot) = snapshots.recv().await {
            println!("{}", render(&snapshot, pretty)?);
            printed += 1;
        }
        Ok::<_, anyhow::Error>(printed)
    });

    let reader: Box<dyn AsyncRead + Unpin + Send> = if file == Path::new("-") {
        Box::new(tokio::io::stdin())
    } else {
        let opened = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("Failed to open {}", file.display()))?;
        Box::new(opened)
    };

    let mut lines = BufReader::new(reader).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if let Some(notification) = parse_line(line_no, &line) {
            handle.notify(notification)?;
        }
    }

    // Dropping the watcher drops its sink, which ends the printer.
    let watcher = handle.shutdown().await?;
    let final_state = watcher.snapshot();
    drop(watcher);

    let printed = printer.await??;
    info!(
        "Replayed {} lines, {} snapshots, completed={}",
        line_no, printed, final_state.completed
    );

    Ok(())
}

/// Parse one recording line. Blank and malformed lines are skipped.
fn parse_line(line_no: usize, line: &str) -> Option<Notification> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(notification) => Some(notification),
        Err(e) => {
            warn!("Skipping line {}: {}", line_no, e);
            None
        }
    }
}

/// `line:column` of a code-point offset.
fn locate_in(text: &str, offset: usize) -> Result<String> {
    let (line, column) = map_offset(text, offset)?;
    Ok(format!("{}:{}", line, column))
}

fn render(snapshot: &GoalSnapshot, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    Ok(rendered)
}
