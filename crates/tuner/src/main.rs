use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use stream_resolver::{ChannelDirectory, NostrRelay, RelayConfig, StreamSession};

const EMBEDDED_CHANNELS: &str = include_str!("../channels.json");

#[derive(Debug, Parser)]
#[command(name = "tuner")]
#[command(about = "Resolve a channel name or note id into a playable stream setup")]
struct Args {
    /// Channel name or note id to resolve
    token: Option<String>,

    /// Relay URL. Falls back to STREAM_RELAY_URL, then the built-in default.
    #[arg(long)]
    relay: Option<String>,

    /// Channel directory JSON path (defaults to the built-in directory)
    #[arg(long)]
    channels: Option<PathBuf>,

    /// Connect/fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// List the channel directory and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let directory = match args.channels.as_ref() {
        Some(path) => ChannelDirectory::from_path(path)?,
        None => ChannelDirectory::from_json(EMBEDDED_CHANNELS)?,
    };

    if args.list {
        for entry in directory.entries() {
            println!("{}\t{}\t{}", entry.name, entry.title, entry.note_id);
        }
        return Ok(());
    }

    let token = args
        .token
        .ok_or("missing channel name or note id (or use --list)")?;

    let mut config = match args.relay {
        Some(url) => RelayConfig::new(url),
        None => RelayConfig::from_env(),
    };
    config.timeout = Duration::from_secs(args.timeout_secs);
    info!(relay = %config.url, "using relay");

    let relay = Arc::new(NostrRelay::new(config));
    let session = StreamSession::new(relay, directory);

    let mut status = session.relay_status();
    let status_log = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = *status.borrow();
            info!(status = %current, "relay status");
        }
    });

    session.navigate(&token).await;
    session.close().await;
    status_log.abort();

    let publication = session.publication().borrow().clone();
    if !publication.is_empty() {
        info!(publication = %publication, "resolution finished");
    }

    let setup = session.setup().borrow().clone();
    match setup {
        Some(setup) => {
            println!("{}", serde_json::to_string_pretty(&setup)?);
            Ok(())
        }
        None => {
            let reason = if publication.is_empty() {
                "relay connection failed".to_string()
            } else {
                publication
            };
            Err(format!("no stream descriptor: {reason}").into())
        }
    }
}
