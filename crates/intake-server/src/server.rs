use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::Router;
use intake_config::{AppConfig, ServerConfig};
use intake_store::Store;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::ApiKeyGate;
use crate::intake::Intake;
use crate::notify::{Notifier, NotifyError};
use crate::routes::{router, AppState};
use crate::store::SqliteSubmissionStore;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("no api key in env var {env}; set it or enable server.allow_unauthenticated")]
    MissingApiKey { env: String },
    #[error("invalid cors origin {0:?}")]
    InvalidCorsOrigin(String),
    #[error("notifier setup failed: {0}")]
    Notifier(#[from] NotifyError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads the shared secret named by `server.api_key_env`.
pub fn api_key_gate(config: &ServerConfig) -> Result<ApiKeyGate, ServerError> {
    let key = env::var(&config.api_key_env)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    match key {
        Some(key) => Ok(ApiKeyGate::new(key)),
        None if config.allow_unauthenticated => {
            warn!(env = %config.api_key_env, "no api key configured; submissions are unauthenticated");
            Ok(ApiKeyGate::open())
        }
        None => Err(ServerError::MissingApiKey {
            env: config.api_key_env.clone(),
        }),
    }
}

pub fn build_state(config: &AppConfig, store: Store) -> Result<AppState, ServerError> {
    let gate = api_key_gate(&config.server)?;
    let notifier = Notifier::from_config(&config.notifications)?;
    if notifier.is_none() {
        info!("notifications disabled");
    }
    let store = SqliteSubmissionStore::new(
        store,
        Duration::from_secs(config.store.timeout_seconds),
    );
    let intake = Intake::new(
        Arc::new(store),
        notifier,
        config.limits.clone(),
        config.recruitment.clone(),
        config.registration.clone(),
    );
    Ok(AppState { intake, gate })
}

pub fn build_app(state: AppState, config: &ServerConfig) -> Result<Router, ServerError> {
    Ok(router(state)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )))
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }
    let mut parsed = Vec::with_capacity(origins.len());
    for origin in origins {
        let value = HeaderValue::from_str(origin)
            .map_err(|_| ServerError::InvalidCorsOrigin(origin.clone()))?;
        parsed.push(value);
    }
    Ok(layer.allow_origin(AllowOrigin::list(parsed)))
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
