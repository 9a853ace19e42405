//! API routes

pub mod health;
pub mod search;
pub mod token;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::{require_auth, TOKEN_ISSUANCE_PATH},
    config::Config,
    state::AppState,
};

/// CORS policy: any origin unless an allow-list is configured
fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = &config.cors_allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create all API routes
///
/// The authorization middleware wraps every route, including the fallback,
/// and decides per request whether a token is needed.
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth_state();

    let health_routes = Router::new()
        .route("/", get(health::root))
        .route("/health/live", get(health::liveness))
        .route("/v1/search/healthcheck", get(health::healthcheck));

    let api_routes = Router::new()
        .route(TOKEN_ISSUANCE_PATH, post(token::login_for_access_token))
        .route("/v1/from_query", post(search::from_query));

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(middleware::from_fn_with_state(auth_state, require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}
