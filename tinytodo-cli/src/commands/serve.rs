//! HTTP server command
//!
//! Opens the selected item store and serves the items API until shutdown.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tinytodo_server::models::PageLimits;
use tinytodo_server::{run_server, store, Resolver, ServerConfig, StoreConfig};

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Process memory, lost on exit
    Memory,
    /// SQLite database file
    Sqlite,
    /// Redis sorted set + key/value
    Redis,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite database URL (used with --store sqlite)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tinytodo.db")]
    pub database_url: String,

    /// Redis URL (used with --store redis)
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Page size when a request omits `first`
    #[arg(long, default_value_t = 20)]
    pub default_first: u32,

    /// Largest page size a request may ask for
    #[arg(long, default_value_t = 100)]
    pub max_first: u32,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    pub fn store_config(&self) -> StoreConfig {
        match self.store {
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::Sqlite => StoreConfig::Sqlite {
                url: self.database_url.clone(),
            },
            StoreKind::Redis => StoreConfig::Redis {
                url: self.redis_url.clone(),
            },
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_first: self.default_first,
            max_first: self.max_first.max(1),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store_config = args.store_config();

    let store = store::open(&store_config)
        .await
        .with_context(|| format!("Failed to open {} store", store_config))?;

    let resolver = Resolver::new(store.clone()).with_limits(args.page_limits());

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting tinytodo server on {}", args.bind);

    // Run server (blocks until shutdown)
    let served = run_server(resolver, config).await.context("Server error");

    store.close().await.context("Failed to close item store")?;
    served
}
