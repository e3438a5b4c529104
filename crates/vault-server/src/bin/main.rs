//! textvault server
//!
//! Stores submitted text, optionally RSA-encrypted under a fresh key pair
//! whose password-protected private key is handed back to the caller.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use vault_core::{
    CryptoEngine, FileRecordStore, ItemService, MemoryRecordStore, RecordStore, Settings,
    SettingsManager, UuidGenerator,
};
use vault_server::VaultServer;

/// textvault - store text, optionally encrypted with a per-item RSA key
#[derive(Parser, Debug)]
#[command(name = "textvault-server")]
#[command(version)]
#[command(about = "textvault - store and retrieve optionally encrypted text over HTTP")]
struct Args {
    /// Directory holding settings.json
    #[arg(long, env = "TEXTVAULT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Directory for record files
    #[arg(long, env = "TEXTVAULT_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// HTTP listen port (default: 8080)
    #[arg(long, env = "TEXTVAULT_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// One of trace, debug, info, warn, error
    #[arg(long, env = "TEXTVAULT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Keep records in memory only
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => Settings::default_config_dir()?,
    };
    let mut settings = SettingsManager::load(&config_dir)
        .map_err(|e| format!("Failed to load settings: {}", e))?
        .into_settings();

    if let Some(dir) = args.storage_dir {
        settings.storage_dir = Some(dir);
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }
    settings.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(settings.level()?.into()),
        )
        .init();

    let store: Arc<dyn RecordStore> = if args.memory_store {
        info!("Using in-memory record store");
        Arc::new(MemoryRecordStore::new())
    } else {
        let dir = settings.effective_storage_dir()?;
        info!("Storing records in {:?}", dir);
        Arc::new(FileRecordStore::new(dir)?)
    };

    let service = ItemService::new(store, Arc::new(UuidGenerator), CryptoEngine::new(settings.kdf));

    let server = VaultServer::new(Arc::new(service))
        .with_addr(SocketAddr::new(args.bind, settings.port));
    server.run().await?;

    Ok(())
}
