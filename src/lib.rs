pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use config::persona::resolve_persona;
use llm::LlmConfig;
use log::info;
use relay::Relay;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub fn log_configuration(args: &Args, llm_config: &LlmConfig) {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", llm_config.completion_model);
    info!("Chat Base URL: {}", llm_config.base_url);
    info!("Chat API Key: {}", llm_config.redacted_key());
    info!("Request Timeout: {}s", llm_config.timeout.as_secs());
    info!("Persona Path: {}", args.persona_path.as_deref().unwrap_or("built-in"));
    info!("Rate Limit: {}", match args.rate_limit_per_minute {
        0 => "disabled".to_string(),
        n => format!("{} per minute", n),
    });
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = LlmConfig::from_args(&args);
    log_configuration(&args, &llm_config);

    url::Url::parse(&llm_config.base_url)
        .map_err(|e| format!("Invalid chat base URL '{}': {}", llm_config.base_url, e))?;

    let persona = resolve_persona(args.persona_path.as_deref())?;
    let relay = Arc::new(Relay::from_config(&llm_config, persona)?);

    let server = Server::new(args.server_addr.clone(), relay, args);
    server.run().await?;

    Ok(())
}
