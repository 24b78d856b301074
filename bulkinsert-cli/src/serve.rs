//! Serve command: configuration, fail-fast startup and the server loop.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use bulkinsert_server::{run_server, AppState, DbConfig, PgGateway, ServerConfig};

/// Arguments for the bulk-insert server
#[derive(Parser, Debug)]
#[command(name = "bulkinsert", version, about)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BULKINSERT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Database host
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", default_value = "postgres", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "PGDATABASE", default_value = "bulkinsert")]
    pub db_name: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = 10)]
    pub max_connections: u32,

    /// Full database URL (overrides the individual --db-* settings)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.max_connections,
            url: self.database_url.clone(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.db_config();
    match &db_config.url {
        Some(_) => tracing::info!("Connecting to database from DATABASE_URL"),
        None => tracing::info!(
            host = %db_config.host,
            port = db_config.port,
            database = %db_config.database,
            "Connecting to database"
        ),
    }

    let gateway = PgGateway::connect(&db_config)
        .await
        .context("Database startup failed")?;

    let result = run_server(AppState::new(gateway.clone()), args.server_config())
        .await
        .context("Server error");

    gateway.close().await;
    result
}
