//! Development server for working on team clients
//!
//! This binary runs the teams API on an in-memory store seeded with demo
//! teams and students, and prints the tokens needed to talk to it.
//!
//! Usage: cargo run -p dev-server
//!
//! Set PORT (directly or in a .env file) to pin the port; otherwise the OS
//! picks one.

use anyhow::Result;
use test_helpers::mock::DevDataset;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if available
    let _ = dotenvy::dotenv();

    // Initialize logging
    let subscriber = api::telemetry::get_subscriber("info".into());
    api::telemetry::init_subscriber(subscriber)?;

    info!("🚀 Starting teams development server");

    let config = api::Config::from_env()?;
    let app = test_helpers::spawn_app_on_port(config.port).await;

    info!("✅ API server running on {}", app.address());

    info!("📊 Setting up development test data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API_URL={}", app.address());
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
