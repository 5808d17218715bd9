use chirp_server::config::ServerConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chirp-server")]
#[command(about = "Chirp authenticated record store")]
struct Cli {
    /// Delete the database file before starting
    #[arg(long)]
    debug: bool,

    #[arg(short, long)]
    port: Option<u16>,

    /// Path of the JSON database document
    #[arg(long)]
    db: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chirp_server=info,chirp_core=info,tower_http=info".into());

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if cli.debug {
        match std::fs::remove_file(&config.db_path) {
            Ok(()) => info!("Debug mode: removed {:?}", config.db_path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Debug mode: could not remove {:?}: {}", config.db_path, e),
        }
    }

    chirp_server::run(config).await
}
