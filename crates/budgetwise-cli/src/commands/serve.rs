//! Server command implementation

use std::path::Path;

use anyhow::Result;
use budgetwise_core::{AIClient, AdviceBackend};

use super::load_config;

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.server.host = host.to_string();
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let ai = AIClient::from_config(&config.provider);

    println!("🚀 Starting Budgetwise API server...");
    println!(
        "   Listening: http://{}:{}",
        config.server.host, config.server.port
    );
    println!(
        "   Session timeout: {}s",
        config.server.session_timeout_secs
    );
    match &ai {
        Some(client) => println!(
            "   Advice provider: {} ({})",
            client.backend_name(),
            client.model()
        ),
        None => println!(
            "   ⚠️  No advice provider configured; /api/advice will return 503"
        ),
    }
    println!();
    println!("   Press Ctrl+C to stop");

    budgetwise_server::serve(config, ai).await?;

    Ok(())
}
