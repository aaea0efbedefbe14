//! fastroutes Service Library
//!
//! HTTP handlers and types for the route ranking service.
//! This library is used by both the fastroutes-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use fastroutes::RouteAggregator;

/// Application state shared across handlers.
pub struct AppState {
    /// Aggregator used to fetch and rank routes.
    pub aggregator: RouteAggregator,
}

/// Build the API router without middleware or documentation routes.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes", get(handlers::get_routes))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, HealthResponse, RouteEntry, RoutesResponse};
