//! CrisisSim MCP server entry point.
//!
//! Runs the crisis-simulation tool server over stdio transport.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... crisis-sim
//! ```
//!
//! Without an API key the server runs in template-fallback mode: every
//! narrative comes from the deterministic templates. Configure in an MCP
//! client as:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "crisis-sim": {
//!       "command": "crisis-sim"
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use chrono::Utc;
use crisis_sim_core::ServerConfig;
use crisis_sim_server::CrisisSimService;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging to stderr (stdout is for the MCP protocol).
    // RUST_LOG wins over the LOG_LEVEL default.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{},crisis_sim_server=debug", config.log_level))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    config.validate()?;

    tracing::info!("Starting crisis-sim server v{}", env!("CARGO_PKG_VERSION"));
    if config.has_provider() {
        tracing::info!(model = %config.provider.model, "text-generation provider configured");
    } else {
        tracing::info!("no API key configured, running in template-fallback mode");
    }

    let service = CrisisSimService::from_config(&config);

    // Hourly sweep evicting sessions older than 24 hours
    let store = service.store();
    let max_age = config.session_max_age;
    let sweep_interval = config.sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        // The first tick fires immediately; skip it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_older_than(max_age, Utc::now()).await;
            if evicted > 0 {
                tracing::info!(evicted, "cleaned up expired sessions");
            }
        }
    });

    // Run the service over stdio transport
    let service = service.serve(stdio()).await?;
    service.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
