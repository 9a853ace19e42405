//! Search proxy endpoint

use axum::{extract::State, Json};
use searchgate_shared::{SearchQuery, SearchResponse};

use crate::{auth::AuthUser, error::ApiResult, state::AppState};

/// POST /v1/from_query
pub async fn from_query(
    State(state): State<AppState>,
    user: AuthUser,
    Json(query): Json<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    query.context.validate()?;

    tracing::info!(
        username = %user.username,
        engine_type = %query.engine_type,
        "search: forwarding query"
    );

    let response = state.search.search(&query).await?;
    Ok(Json(response))
}
