use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::ApiKey;
use crate::error::AppResult;
use crate::models::Metadata;
use crate::state::AppState;

// ── Query params ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    /// Optional so a missing parameter gets the JSON 400 from the resolver
    /// instead of axum's plain-text query rejection.
    pub url: Option<String>,
}

// ── Handler ────────────────────────────────────────────────────────────────

/// GET /metadata?url=<encoded-url>
///
/// Resolves title, description, site name and preview images for the URL.
/// Requires the `X-API-Key` header.
pub async fn get_metadata(
    State(state): State<AppState>,
    _auth: ApiKey,
    Query(params): Query<MetadataQuery>,
) -> AppResult<Json<Metadata>> {
    let url = params.url.unwrap_or_default();
    let metadata = state.resolver.resolve(&url).await?;
    Ok(Json(metadata))
}
