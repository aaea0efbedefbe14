//! Client for the remote routing service.
//!
//! [`RouteClient`] performs one request/reply cycle per source/destination
//! pair against an OSRM `route` endpoint and turns the reply into either a
//! [`RouteMetric`] or a classified [`RouteError`].
//!
//! ```ignore
//! use fastroutes::{Coordinate, RouteClient};
//!
//! let client = RouteClient::new()?;
//! let metric = client
//!     .fetch_route(
//!         Coordinate::new(13.388860, 52.517037),
//!         Coordinate::new(13.397634, 52.529407),
//!         false,
//!     )
//!     .await?;
//! println!("{}m in {}s", metric.distance, metric.duration);
//! ```

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONNECTION;
use reqwest::{Client, StatusCode};

use crate::coordinate::Coordinate;
use crate::error::{Result, RouteError};
use crate::reply::{validate_reply, RouteMetric, ServiceReply};

/// Driving profile of the public OSRM demo server.
pub const DEFAULT_SERVICE_URL: &str = "http://router.project-osrm.org/route/v1/driving";

/// Anything that can answer a single route query.
///
/// [`RouteClient`] is the network implementation. The aggregator only
/// depends on this trait.
pub trait RouteSource {
    /// Fetch the route metric from `source` to `destination`.
    ///
    /// `keep_alive` asks for the underlying connection to stay open after
    /// the reply; `false` asks for it to be closed.
    fn fetch_route(
        &self,
        source: Coordinate,
        destination: Coordinate,
        keep_alive: bool,
    ) -> impl Future<Output = Result<RouteMetric>> + Send;
}

/// HTTP client for the routing service.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RouteClient {
    client: Client,
    service_url: String,
}

impl RouteClient {
    /// Create a client for [`DEFAULT_SERVICE_URL`] without a request timeout.
    pub fn new() -> Result<Self> {
        RouteClientBuilder::new().build()
    }

    /// Create a builder for configuring a client.
    pub fn builder() -> RouteClientBuilder {
        RouteClientBuilder::new()
    }

    /// Base URL requests are sent to.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Build the query URL for a source/destination pair.
    ///
    /// Route geometry is disabled so the reply only carries metrics.
    pub fn route_url(&self, source: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/{};{}?overview=false",
            self.service_url, source, destination
        )
    }

    /// Fetch a single route from `source` to `destination`.
    ///
    /// The reply is validated before the HTTP status is looked at: an error
    /// payload from the service is more descriptive than the status line, so
    /// it wins when both are present.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Transport`] if the request fails or the body cannot be read
    /// - [`RouteError::Decode`] if the body is not a service reply
    /// - [`RouteError::Api`] / [`RouteError::RouteCount`] if validation fails
    /// - [`RouteError::HttpStatus`] if the reply is valid but the status is not 200
    pub async fn fetch_route(
        &self,
        source: Coordinate,
        destination: Coordinate,
        keep_alive: bool,
    ) -> Result<RouteMetric> {
        let url = self.route_url(source, destination);
        let connection = if keep_alive { "keep-alive" } else { "close" };

        tracing::debug!(url = %url, connection, "Requesting route");

        let response = self
            .client
            .get(&url)
            .header(CONNECTION, connection)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let reply: ServiceReply = serde_json::from_slice(&body)?;

        validate_reply(&reply)?;

        if status != StatusCode::OK {
            return Err(RouteError::HttpStatus { status });
        }

        Ok(reply.routes[0])
    }
}

impl RouteSource for RouteClient {
    fn fetch_route(
        &self,
        source: Coordinate,
        destination: Coordinate,
        keep_alive: bool,
    ) -> impl Future<Output = Result<RouteMetric>> + Send {
        RouteClient::fetch_route(self, source, destination, keep_alive)
    }
}

/// Builder for [`RouteClient`].
#[derive(Debug, Clone)]
pub struct RouteClientBuilder {
    service_url: String,
    timeout: Option<Duration>,
}

impl Default for RouteClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteClientBuilder {
    /// Create a builder targeting [`DEFAULT_SERVICE_URL`].
    pub fn new() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `FASTROUTES_SERVICE_URL` | Base URL of the routing service | OSRM demo server |
    /// | `FASTROUTES_REQUEST_TIMEOUT_SECS` | Timeout for a single request | None |
    ///
    /// Unparsable values and a zero timeout are ignored.
    ///
    /// # Example
    ///
    /// ```bash
    /// export FASTROUTES_SERVICE_URL=http://localhost:5000/route/v1/driving
    /// export FASTROUTES_REQUEST_TIMEOUT_SECS=10
    /// ```
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        if let Ok(url) = std::env::var("FASTROUTES_SERVICE_URL") {
            if !url.trim().is_empty() {
                builder = builder.service_url(url);
            }
        }

        builder.timeout = std::env::var("FASTROUTES_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        builder
    }

    /// Set the base URL of the routing service.
    ///
    /// Coordinates are appended as a path segment, so this should point at
    /// a profile, e.g. `http://localhost:5000/route/v1/driving`.
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a timeout for each individual request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the [`RouteClient`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Transport`] if the HTTP client cannot be
    /// created (e.g., due to TLS initialization failure).
    pub fn build(self) -> Result<RouteClient> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(RouteClient {
            client: builder.build()?,
            service_url: self.service_url,
        })
    }
}
