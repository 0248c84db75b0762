//! CLI entry point for akakce-search.

use anyhow::Result;

mod app;
mod app_config;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    app::runtime::run().await
}
