//! searchgate API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use searchgate_api::{
    auth::{Authenticator, InMemoryCredentialStore, TokenCodec},
    routes::create_router,
    search::HttpSearchBackend,
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("searchgate_api=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down API...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;

    let store = match &config.credentials_file {
        Some(path) => InMemoryCredentialStore::from_json_file(path)
            .context("Failed to load credential store")?,
        None => {
            tracing::warn!("CREDENTIALS_FILE not set; no user can obtain a token");
            InMemoryCredentialStore::default()
        }
    };

    let authenticator = Authenticator::new(
        Arc::new(store),
        TokenCodec::new(&config.jwt_secret),
        time::Duration::minutes(config.access_token_expire_minutes),
    )
    .context("Failed to initialise authenticator")?;

    let search = HttpSearchBackend::new(
        config.search_backend_url.clone(),
        Duration::from_millis(config.search_request_timeout_ms),
    )
    .context("Failed to build search backend client")?;

    let bind_address = config.bind_address.clone();
    tracing::info!(
        search_backend = %search.endpoint(),
        required_role = %config.required_role,
        token_ttl_minutes = config.access_token_expire_minutes,
        "Configuration loaded"
    );

    let state = AppState::new(config, Arc::new(authenticator), Arc::new(search));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!(address = %bind_address, "searchgate API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
