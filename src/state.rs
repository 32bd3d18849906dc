use std::sync::Arc;

use crate::resolver::Resolver;

/// Shared application state passed to all handlers and extractors.
/// The service API key is stored here (read once at startup) rather than
/// re-reading from the environment on every request.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub api_key: Arc<str>,
}
