use std::path::PathBuf;

use anyhow::Result;
use board_core::{
    FileTicketSource, HttpTicketSource, KanbanBoard, LoadState, MemoryPreferenceStore,
    PreferenceStore, TicketSource,
};
use clap::Parser;
use shared::domain::{GroupKey, OrderKey};
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{normalize_database_url, validate_api_url, Settings};
use render::OutputFormat;

/// Show tickets as kanban columns grouped and ordered by the saved selection.
#[derive(Parser, Debug)]
#[command(name = "board", version)]
struct Args {
    /// Ticket endpoint; overrides board.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Preference database, e.g. sqlite://./data/board.db
    #[arg(long)]
    database_url: Option<String>,
    /// Read the ticket document from a JSON file instead of the endpoint.
    #[arg(long)]
    from_file: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Change and save the grouping: status, user or priority.
    #[arg(long)]
    group_by: Option<GroupKey>,
    /// Change and save the ordering: priority or title.
    #[arg(long)]
    order_by: Option<OrderKey>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(api_url) = &args.api_url {
        settings.api_url = api_url.clone();
    }
    if let Some(database_url) = &args.database_url {
        settings.database_url = database_url.clone();
    }

    let source = ticket_source(&args, &settings)?;
    let store = preference_store(&settings).await;

    let mut board = KanbanBoard::new(source, store);
    board.mount().await;

    if let Some(group_by) = args.group_by {
        board.set_group_by(group_by).await;
    }
    if let Some(order_by) = args.order_by {
        board.set_order_by(order_by).await;
    }

    if let LoadState::Failed(reason) = board.load_state() {
        warn!(%reason, "showing an empty board");
    }

    let output = render::render(&board.snapshot(), args.format)?;
    print!("{output}");
    Ok(())
}

fn ticket_source(args: &Args, settings: &Settings) -> Result<Box<dyn TicketSource>> {
    if let Some(path) = &args.from_file {
        info!(path = %path.display(), "loading tickets from file");
        return Ok(Box::new(FileTicketSource::new(path.clone())));
    }

    let endpoint = validate_api_url(&settings.api_url)?;
    info!(%endpoint, "loading tickets from endpoint");
    Ok(Box::new(HttpTicketSource::with_timeout(
        endpoint,
        settings.request_timeout(),
    )?))
}

// Falls back to a process-local store when the database cannot be opened.
async fn preference_store(settings: &Settings) -> Box<dyn PreferenceStore> {
    let database_url = normalize_database_url(&settings.database_url);
    match Storage::new(&database_url).await {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            warn!(
                %database_url,
                error = %err,
                "preference database unavailable; selections will not persist"
            );
            Box::new(MemoryPreferenceStore::new())
        }
    }
}
