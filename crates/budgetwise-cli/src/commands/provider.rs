//! Advice provider and configuration commands

use std::path::Path;

use anyhow::{Context, Result};
use budgetwise_core::config::default_config_path;
use budgetwise_core::{AIClient, AdviceBackend};

use super::load_config;

/// Health check the configured provider and optionally send a sample prompt
pub async fn cmd_provider_test(
    config_path: Option<&Path>,
    model: Option<&str>,
    probe: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = &config.provider;

    println!("🔍 Testing advice provider...\n");
    println!("  Backend: {}", provider.backend);
    println!("  Model:   {}", model.unwrap_or(provider.model()));
    println!("  Timeout: {}s\n", provider.timeout_secs);

    let Some(mut client) = AIClient::from_config(provider) else {
        println!("❌ Provider is not configured\n");
        println!("To use Gemini:");
        println!("  export GOOGLE_API_KEY=<your key>   (or put it in .env)");
        println!("\nOr pick another backend:");
        println!("  export AI_BACKEND=ollama            (OLLAMA_HOST, OLLAMA_MODEL)");
        println!("  export AI_BACKEND=openai_compatible (OPENAI_COMPATIBLE_HOST, ...)");
        return Ok(());
    };
    if let Some(model) = model {
        client = client.with_model(model);
    }

    print!("Checking availability at {}... ", client.host());
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the provider or the credentials were rejected.");
        return Ok(());
    }

    if probe {
        println!("\n📋 Sending a sample request...\n");
        let reply = client
            .generate_advice("Reply with one short sentence of budgeting advice.")
            .await
            .context("Sample request failed")?;
        println!("  {}", reply.trim());
    }

    println!("\n✅ Provider is ready");
    Ok(())
}

/// Show the resolved configuration (API keys are never printed)
pub fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let source = match config_path {
        Some(p) => p.display().to_string(),
        None => match default_config_path() {
            Some(p) if p.exists() => p.display().to_string(),
            Some(p) => format!("embedded defaults (no override at {})", p.display()),
            None => "embedded defaults".to_string(),
        },
    };
    println!("# Source: {}", source);

    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    println!("{}", rendered);

    let has_key = config
        .provider
        .endpoint()
        .is_some_and(|e| e.api_key.is_some());
    println!(
        "# API key for {}: {}",
        config.provider.backend,
        if has_key { "set" } else { "not set" }
    );

    Ok(())
}
