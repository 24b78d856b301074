//! bulkinsert - HTTP service that stores batches of transaction records
//!
//! Connects to PostgreSQL, prepares the insert statement, then serves
//! `POST /bulkinsert` until interrupted. Any startup failure is fatal.

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod serve;

use serve::ServeArgs;

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing().ok();
    let args = ServeArgs::parse();

    serve::run_serve(args).await
}
