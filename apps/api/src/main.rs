mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod store;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::engine::{ConversationEngine, EnginePolicy};
use crate::screening::question_generator::{LlmQuestionSource, QuestionGenerator};
use crate::screening::service::ScreeningService;
use crate::state::AppState;
use crate::store::{MemorySessionStore, PgSessionStore, RedisSessionStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    info!("Initializing {} session store", config.store_backend.name());
    let store = build_store(&config.store_backend).await?;
    info!("Session store ready (backend: {})", store.backend());

    let questions = build_question_chain(&config)?;
    info!(
        "Question chain: {:?} -> question_bank (timeout {}s)",
        questions.source_names(),
        config.generation_timeout.as_secs()
    );

    let engine = ConversationEngine::new(
        Arc::new(questions),
        EnginePolicy {
            require_meaningful_answers: config.require_meaningful_answers,
        },
    );

    let state = AppState {
        screening: Arc::new(ScreeningService::new(store, engine)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(backend: &StoreBackend) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match backend {
        StoreBackend::Postgres { database_url } => {
            Arc::new(PgSessionStore::new(create_pool(database_url).await?))
        }
        StoreBackend::Redis { redis_url } => {
            let client = redis::Client::open(redis_url.as_str())?;
            Arc::new(RedisSessionStore::connect(&client).await?)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory session store; sessions are lost on restart");
            Arc::new(MemorySessionStore::new())
        }
    };
    Ok(store)
}

/// LLM source first when a key is configured; the bank always closes the chain.
fn build_question_chain(config: &Config) -> Result<QuestionGenerator> {
    let chain = QuestionGenerator::bank_only(config.generation_timeout);

    let Some(api_key) = config.anthropic_api_key.clone() else {
        warn!("ANTHROPIC_API_KEY not set; interview questions will come from the static bank");
        return Ok(chain);
    };

    let llm = LlmClient::new(api_key).context("failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, strategy: {:?})",
        llm_client::MODEL,
        config.question_strategy
    );

    Ok(chain.with_source(Arc::new(LlmQuestionSource::new(
        Arc::new(llm),
        config.question_strategy,
    ))))
}

fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}
