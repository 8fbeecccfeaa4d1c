use std::sync::Arc;

use crate::screening::service::ScreeningService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub screening: Arc<ScreeningService>,
}
