//! ollama-chat - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use ollama_chat::{
    cli::Args,
    config::Config,
    repl::{ChatSession, InputHandler},
    streaming::OllamaClient,
    telemetry,
};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    telemetry::init_tracing(verbosity.log_filter());

    let config = Config::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(args.url, args.model, args.timeout_secs);
    config.validate().context("Invalid configuration")?;
    debug!(?config, verbosity = verbosity.as_str(), "configuration resolved");

    let client = OllamaClient::with_config(&config.server.url, &config.server.model, config.timeout())
        .context("Failed to create HTTP client")?;
    let mut input = InputHandler::new().context("Failed to initialize line editor")?;

    let mut session = ChatSession::new(client).with_stats(verbosity.show_stats());
    session.show_welcome(&config.server.url, &config.server.model);
    session.run(&mut input).await?;

    Ok(())
}
