//! bizpulse HTTP Server
//!
//! Serves the financial health dashboard endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bizpulse::api::{router, AppState};
use bizpulse::core::config::{ServerConfig, StorageKind};
use bizpulse::health::ErpDataSource;
use bizpulse::storage::{ErpRepository, FileStore, InMemoryStore, SeedData, StorageBackend};

/// bizpulse server - financial health scoring over HTTP
#[derive(Parser)]
#[command(name = "bizpulse-server")]
#[command(version = bizpulse::VERSION)]
#[command(about = "HTTP server for the bizpulse financial health dashboard", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "BIZPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Seed data loaded at startup
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Storage backend (memory, file)
    #[arg(long)]
    storage: Option<StorageKind>,

    /// Directory for the file backend
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let base = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ServerConfig::default(),
        };
        let mut config = base.with_env_overrides()?;

        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(seed) = &self.seed {
            config.seed_file = Some(seed.clone());
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn open_repository<B: StorageBackend + 'static>(
    backend: B,
    seed_file: Option<&PathBuf>,
) -> anyhow::Result<Arc<dyn ErpDataSource>> {
    let repo = ErpRepository::new(backend);
    if let Some(path) = seed_file {
        let seed = SeedData::from_file(path)?;
        repo.load_seed(&seed)?;
    }
    Ok(Arc::new(repo))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let source = match config.storage {
        StorageKind::Memory => open_repository(InMemoryStore::new(), config.seed_file.as_ref())?,
        StorageKind::File => open_repository(
            FileStore::new(&config.data_dir)?,
            config.seed_file.as_ref(),
        )?,
    };

    let app = router(Arc::new(AppState::new(source)));
    let addr: SocketAddr = config.bind_addr.parse()?;

    info!("Starting {} v{} on {}", bizpulse::SERVICE_NAME, bizpulse::VERSION, addr);
    info!("Storage backend: {}", config.storage);
    info!("API endpoints:");
    info!("  GET  /health           - Health check");
    info!("  GET  /financial-health - Financial health report");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
