//! fanout-rag - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use fanout_rag::{
    backend::{BackendClient, OpenAiClient, ScriptedBackend},
    cli::{Args, Commands},
    config::Config,
    logging::{init_tracing, FileRequestLogger, RequestLogger},
    server::{self, AppState},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity().filter());

    // `init` may target a config file that does not exist yet
    let mut config = match (args.command(), &args.config) {
        (Commands::Init { .. }, Some(path)) if !path.exists() => Config::default(),
        _ => Config::load(args.config.as_deref())?,
    };
    args.apply(&mut config);

    match args.command() {
        Commands::Serve => serve(config).await?,
        Commands::Models => list_models(&config)?,
        Commands::Config => show_config(&config)?,
        Commands::Init { force } => init_config(&args, &config, force)?,
    }

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let backend: Arc<dyn BackendClient> = match config.api_key()? {
        Some(key) => Arc::new(
            OpenAiClient::with_config(&config.backend.base_url, key, config.timeout())
                .context("Failed to build backend client")?,
        ),
        None => {
            tracing::warn!("Offline mode: models echo the last user message");
            Arc::new(ScriptedBackend::new())
        }
    };

    let logger = FileRequestLogger::new(&config.logging.dir, &config.logging.file)
        .context("Failed to open request log")?;
    tracing::info!("Request log: {}", logger.path().display());
    let logger: Arc<dyn RequestLogger> = Arc::new(logger);

    let state = AppState::from_config(&config, backend, logger)?;
    tracing::info!(
        models = state.orchestrator.registry().len(),
        rag_model = %state.rag.config().model,
        "gateway ready"
    );

    server::run(Arc::new(state), &config.bind_address()).await
}

fn list_models(config: &Config) -> Result<()> {
    let registry = config.registry()?;
    println!("Registered models:\n");
    for spec in registry.specs() {
        match &spec.fallback {
            Some(fallback) => println!("  {:<24} max_tokens={:<6} fallback={}", spec.id, spec.max_tokens, fallback),
            None => println!("  {:<24} max_tokens={}", spec.id, spec.max_tokens),
        }
    }
    println!();
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    println!("# Default config path: {}\n", path.display());
    print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
    Ok(())
}

fn init_config(args: &Args, config: &Config, force: bool) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    config.init(&path, force)?;
    println!("Wrote configuration to {}", path.display());
    Ok(())
}
