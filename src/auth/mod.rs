use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// Shared-secret check
// ============================================================================

/// Exact comparison of a presented key with the configured one. An empty
/// presented key never matches.
pub fn key_matches(provided: Option<&str>, expected: &str) -> bool {
    matches!(provided, Some(key) if !key.is_empty() && key == expected)
}

// ============================================================================
// Auth Extractor
// ============================================================================

/// Proof that the request carried the service API key in `X-API-Key`.
/// Add it to a handler's arguments to protect the route.
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        if key_matches(provided, &state.api_key) {
            Ok(ApiKey)
        } else {
            tracing::debug!(present = provided.is_some(), "Rejected request with bad API key");
            Err(AppError::Unauthorized("invalid or missing API key".into()))
        }
    }
}
