use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use grievance_desk::adapters::ai::{
    AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider,
};
use grievance_desk::adapters::http::{app_router, IntakeHandlers};
use grievance_desk::adapters::{
    spawn_eviction_sweeper, InMemorySessionStore, LlmExtractionOracle, LlmReplyOracle,
};
use grievance_desk::application::{GetSessionHandler, ProcessTurnHandler, ResetSessionHandler};
use grievance_desk::config::{AiConfig, AiProvider, AppConfig};
use grievance_desk::ports::{AIError, AIProvider, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    tracing::info!(
        environment = ?config.server.environment,
        provider = ?config.ai.primary_provider,
        "Starting Grievance Desk"
    );

    let provider = build_provider(&config.ai)?;
    if provider.is_none() {
        tracing::warn!("AI provider disabled; every turn will use fallback replies");
    }

    let settings = config.ai.oracle_settings();
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        config.sessions.history_limit,
        config.sessions.max_sessions,
    ));
    let extraction = Arc::new(LlmExtractionOracle::new(provider.clone(), settings));
    let reply = Arc::new(LlmReplyOracle::new(provider, settings));

    let handlers = IntakeHandlers::new(
        Arc::new(ProcessTurnHandler::new(store.clone(), extraction, reply)),
        Arc::new(GetSessionHandler::new(store.clone())),
        Arc::new(ResetSessionHandler::new(store.clone())),
    );
    let app = app_router(
        handlers,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_eviction_sweeper(
        store,
        config.sessions.sweeper_config(),
        shutdown_rx,
    );

    let addr = config.server.socket_addr()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", addr.port());
            }
            return Err(format!("Failed to bind to {}: {}", addr, e).into());
        }
    };
    tracing::info!("Listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Eviction sweeper ended abnormally");
    }

    if let Err(e) = served {
        tracing::error!("Server error: {}", e);
        return Err(format!("Server error: {}", e).into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_provider(ai: &AiConfig) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    let provider: Arc<dyn AIProvider> = match ai.primary_provider {
        AiProvider::Disabled => return Ok(None),
        AiProvider::Anthropic => {
            let mut cfg = AnthropicConfig::new(ai.anthropic_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.model {
                cfg = cfg.with_model(model.clone());
            }
            Arc::new(AnthropicProvider::new(cfg)?)
        }
        AiProvider::OpenAI => {
            let mut cfg = OpenAIConfig::new(ai.openai_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.model {
                cfg = cfg.with_model(model.clone());
            }
            Arc::new(OpenAIProvider::new(cfg)?)
        }
    };
    let info = provider.provider_info();
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        json_mode = info.supports_json_mode,
        "AI provider ready"
    );
    Ok(Some(provider))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
