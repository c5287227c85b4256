mod config;

use anyhow::Result;
use config::Config;
use flum_core::Orchestrator;
use flum_executor::ShellRunner;
use flum_interfaces::{Frontend, TerminalFrontend};
use flum_providers::GeminiClient;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flum=info")),
        )
        .init();

    let config = Config::load(CONFIG_PATH)?;
    tracing::info!(model = %config.model, "configuration loaded");

    let mut client =
        GeminiClient::new(config.api_key.clone(), config.model.clone()).with_os_hint(config.os_hint());
    if let Some(endpoint) = &config.endpoint {
        client = client.with_base_url(endpoint.clone());
    }

    let frontend: Arc<dyn Frontend> = Arc::new(TerminalFrontend::new());
    let mut orchestrator = Orchestrator::new(Arc::new(client), Arc::new(ShellRunner::new()), frontend.clone());
    orchestrator.set_command_timeout(Duration::from_secs(config.command_timeout_secs));

    frontend.show_message("Hello, there. Ask me to do something.").await;
    if config.api_key.is_none() {
        frontend
            .show_message("(No API key configured; only the built-in shortcuts will work.)")
            .await;
    }

    loop {
        let Some(line) = frontend.receive_input().await else {
            break; // EOF
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit") {
            break;
        }

        orchestrator.handle_turn(prompt).await;
    }

    Ok(())
}
