use crate::config::Config;
use crate::enhance::Enhancer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub enhancer: Enhancer,
}
