//! fastroutes Service - HTTP microservice ranking destinations by driving time.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `FASTROUTES_PORT` | HTTP server port | 8080 |
//! | `FASTROUTES_SERVICE_URL` | Base URL of the OSRM routing service | OSRM demo server |
//! | `FASTROUTES_REQUEST_TIMEOUT_SECS` | Timeout for a single routing request | None |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /routes?src=LAT,LON&dst=LAT,LON[&dst=...]` - Rank destinations by travel time
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use fastroutes::{RouteAggregator, RouteClientBuilder};
use fastroutes_service::{app, handlers, AppState};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the fastroutes service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "fastroutes Service",
        version = "0.1.0",
        description = "Ranks destinations by driving time and distance from a source coordinate.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(handlers::get_routes, handlers::health_check),
    components(schemas(
        handlers::RoutesResponse,
        handlers::RouteEntry,
        handlers::ErrorResponse,
        handlers::HealthResponse,
    )),
    tags(
        (name = "routes", description = "Route ranking endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fastroutes_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("FASTROUTES_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let client = RouteClientBuilder::from_env().build()?;

    tracing::info!(
        service_url = client.service_url(),
        port = port,
        "Starting fastroutes service"
    );

    let state = Arc::new(AppState {
        aggregator: RouteAggregator::new(client),
    });

    let router = app(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
