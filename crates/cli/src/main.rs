use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quento_auth::{IdentityVerifier, TokenIssuer};
use quento_core::AppConfig;
use quento_http::{create_router, AppState, ConnectionRegistry, RateLimiter};
use quento_llm::LlmClient;
use quento_service::{
    start_job_worker, AnalysisService, AuthService, ChatService, StrategyService,
};
use quento_storage::PgStorage;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quento")]
#[command(about = "AI-powered business growth coaching backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket API server.
    Serve {
        /// Override QUENTO_PORT.
        #[arg(short, long)]
        port: Option<u16>,
        /// Override QUENTO_HOST.
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Run database migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, host } => serve(config, port, host).await,
        Commands::Migrate => {
            // Connecting runs migrations.
            PgStorage::connect(&config.database_url).await?;
            tracing::info!("migrations complete");
            Ok(())
        },
    }
}

async fn serve(config: AppConfig, port: Option<u16>, host: Option<String>) -> Result<()> {
    let storage = Arc::new(PgStorage::connect(&config.database_url).await?);

    let llm = Arc::new(LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.chat_model.clone(),
    )?);

    let tokens = TokenIssuer::new(
        &config.jwt_secret,
        config.access_token_expire_minutes,
        config.refresh_token_expire_days,
    );

    let identity = config.identity_jwks_url.as_ref().map(|url| {
        tracing::info!(jwks_url = %url, "identity provider verification enabled");
        Arc::new(IdentityVerifier::new(reqwest::Client::new(), url.clone()))
    });

    let jobs = start_job_worker(Arc::clone(&storage));

    let auth_service = Arc::new(AuthService::new(Arc::clone(&storage), tokens, identity));
    let chat_service = Arc::new(ChatService::new(Arc::clone(&storage), Arc::clone(&llm)));
    let analysis_service =
        Arc::new(AnalysisService::new(Arc::clone(&storage), jobs.clone()));
    let strategy_service =
        Arc::new(StrategyService::new(Arc::clone(&storage), jobs.clone()));

    let rate_limiter = RateLimiter::new(config.chat_rate_limit_per_minute);
    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.host.clone()),
        port.unwrap_or(config.port)
    );

    let state = Arc::new(AppState {
        config,
        auth_service,
        chat_service,
        analysis_service,
        strategy_service,
        registry: ConnectionRegistry::new(),
        rate_limiter,
    });

    let router = create_router(state);
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
