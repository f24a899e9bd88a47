//! Smart city API server entry point
//!
//! Configuration comes from command line flags, each of which can also be set
//! through the environment (a `.env` file in the working directory is loaded
//! first).

use anyhow::Context;
use clap::Parser;
use tokio::signal;

use shared::{component_info, logging, Component, ServerConfig, DEFAULT_MAX_GRID_SIZE};
use webserver::{AuditRecord, CityRecord, HealthRecord, Storage, TrafficRecord, WebServer};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Solarpunk smart city API: traffic, health, city generation and audit hashing")]
struct Args {
    /// Interface to bind
    #[arg(long, env = "SMART_CITY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP server
    #[arg(long, env = "SMART_CITY_PORT", default_value_t = 8000)]
    port: u16,

    /// SQLite database file (":memory:" keeps nothing on disk)
    #[arg(long, env = "SMART_CITY_DATABASE", default_value = "smart_city.db")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SMART_CITY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Largest grid_size accepted by /api/city/generate
    #[arg(long, env = "SMART_CITY_MAX_GRID_SIZE", default_value_t = DEFAULT_MAX_GRID_SIZE)]
    max_grid_size: u32,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            database_path: args.database,
            log_level: args.log_level,
            max_grid_size: args.max_grid_size,
        }
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(Component::Server, "Received Ctrl+C signal"),
        Err(err) => logging::log_error(Component::Server, "Signal handling", &err),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::from(Args::parse());

    logging::init_tracing_with_level(Some(&config.log_level));
    logging::log_startup(Component::Server, &format!("smart city API on {}", config.bind_address()));

    let storage = Storage::from_config(&config)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    component_info!(
        Component::Storage,
        database = %config.database_path,
        max_grid_size = config.max_grid_size,
        "Storage ready"
    );

    let webserver = WebServer::new(
        &config,
        storage.repository::<TrafficRecord>(),
        storage.repository::<HealthRecord>(),
        storage.repository::<CityRecord>(),
        storage.repository::<AuditRecord>(),
    );

    webserver
        .run(shutdown_signal())
        .await
        .context("Web server stopped with an error")?;

    logging::log_success(Component::Server, "Web server stopped gracefully");
    Ok(())
}
