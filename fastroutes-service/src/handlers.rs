//! HTTP request handlers for the route ranking service.

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use fastroutes::{Coordinate, RankedRoute, RouteError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for the routes endpoint.
///
/// Only used for documentation: `dst` may repeat, so the handler reads
/// the raw key/value pairs from the request URI.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoutesParams {
    /// Source coordinate as `lat,lon`.
    pub src: String,
    /// Destination coordinate as `lat,lon`. Repeat for several destinations.
    pub dst: Vec<String>,
}

/// Parsed and validated routes query.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutesQuery {
    pub source: Coordinate,
    pub destinations: Vec<Coordinate>,
}

impl RoutesQuery {
    /// Build a query from raw `key=value` pairs.
    ///
    /// Requires exactly one `src` and at least one `dst`. Other keys are
    /// ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, String> {
        let sources: Vec<&str> = values(pairs, "src").collect();
        let [source] = sources.as_slice() else {
            return Err("expected exactly one src parameter".to_string());
        };

        let source = source
            .parse::<Coordinate>()
            .map_err(|e| format!("src: {}", e))?;

        let destinations = values(pairs, "dst")
            .map(|dst| dst.parse::<Coordinate>().map_err(|e| format!("dst: {}", e)))
            .collect::<Result<Vec<_>, _>>()?;

        if destinations.is_empty() {
            return Err("expected at least one dst parameter".to_string());
        }

        Ok(Self {
            source,
            destinations,
        })
    }
}

fn values<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> {
    pairs
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// A ranked destination.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RouteEntry {
    /// Destination coordinate in canonical `lat,lon` form.
    #[schema(example = "13.397634,52.529407")]
    pub destination: String,
    /// Route distance in meters.
    pub distance: f64,
    /// Travel duration in seconds.
    pub duration: f64,
}

impl From<RankedRoute> for RouteEntry {
    fn from(route: RankedRoute) -> Self {
        Self {
            destination: route.destination,
            distance: route.metric.distance,
            duration: route.metric.duration,
        }
    }
}

/// Successful routes response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoutesResponse {
    /// Source coordinate in canonical `lat,lon` form.
    pub source: String,
    /// Destinations ordered by duration, then distance.
    pub routes: Vec<RouteEntry>,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Rank destinations by driving time from a source.
///
/// # Query Parameters
///
/// - `src`: Source coordinate (`lat,lon`), exactly once
/// - `dst`: Destination coordinate (`lat,lon`), one or more times
///
/// # Returns
///
/// - `200 OK` with the ranked destinations
/// - `400 Bad Request` if parameters are missing or malformed
/// - `502 Bad Gateway` if the routing service fails or rejects a query
/// - `504 Gateway Timeout` if the batch does not finish in time
#[utoipa::path(
    get,
    path = "/routes",
    tag = "routes",
    params(RoutesParams),
    responses(
        (status = 200, description = "Destinations ranked fastest first", body = RoutesResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorResponse),
        (status = 502, description = "Routing service error", body = ErrorResponse),
        (status = 504, description = "Routing service did not answer in time", body = ErrorResponse)
    )
)]
pub async fn get_routes(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Response {
    let parsed = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map_err(|e| e.body_text())
        .and_then(|Query(pairs)| RoutesQuery::from_pairs(&pairs));

    let query = match parsed {
        Ok(query) => query,
        Err(message) => {
            tracing::debug!(error = %message, "Rejected routes query");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response();
        }
    };

    tracing::debug!(
        source = %query.source,
        destinations = query.destinations.len(),
        "Routes query"
    );

    match state
        .aggregator
        .fetch_ranked_routes(query.source, &query.destinations)
        .await
    {
        Ok(routes) => {
            tracing::info!(
                source = %query.source,
                destinations = routes.len(),
                "Routes ranked"
            );
            (
                StatusCode::OK,
                Json(RoutesResponse {
                    source: query.source.to_string(),
                    routes: routes.into_iter().map(RouteEntry::from).collect(),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(query.source, e),
    }
}

/// Create an error response for a failed batch.
fn error_response(source: Coordinate, e: RouteError) -> Response {
    let status = match &e {
        RouteError::DeadlineElapsed(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };

    tracing::warn!(source = %source, kind = ?e.kind(), error = %e, "Routes query failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_routes_query_from_pairs() {
        let query = RoutesQuery::from_pairs(&pairs(&[
            ("src", "13.388860,52.517037"),
            ("dst", "13.397634,52.529407"),
            ("dst", "13.428555,52.523219"),
        ]))
        .unwrap();

        assert_eq!(query.source, Coordinate::new(13.388860, 52.517037));
        assert_eq!(
            query.destinations,
            vec![
                Coordinate::new(13.397634, 52.529407),
                Coordinate::new(13.428555, 52.523219),
            ]
        );
    }

    #[test]
    fn test_routes_query_rejects_bad_input() {
        // No src
        assert!(RoutesQuery::from_pairs(&pairs(&[("dst", "1,2")])).is_err());
        // Two src
        assert!(
            RoutesQuery::from_pairs(&pairs(&[("src", "1,2"), ("src", "3,4"), ("dst", "5,6")]))
                .is_err()
        );
        // No dst
        assert!(RoutesQuery::from_pairs(&pairs(&[("src", "1,2")])).is_err());
        // Malformed dst
        let err = RoutesQuery::from_pairs(&pairs(&[("src", "1,2"), ("dst", "75.32,89a")]))
            .unwrap_err();
        assert!(err.starts_with("dst:"));
    }

    #[test]
    fn test_routes_response_serialize() {
        let response = RoutesResponse {
            source: "13.388860,52.517037".to_string(),
            routes: vec![RouteEntry {
                destination: "13.397634,52.529407".to_string(),
                distance: 1886.8,
                duration: 260.3,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["source"], "13.388860,52.517037");
        assert_eq!(json["routes"][0]["destination"], "13.397634,52.529407");
        assert_eq!(json["routes"][0]["distance"], 1886.8);
        assert_eq!(json["routes"][0]["duration"], 260.3);
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }
}
