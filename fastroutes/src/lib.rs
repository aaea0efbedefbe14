//! # fastroutes - Ranked driving routes
//!
//! Fetches driving-route metrics (distance and duration) from an
//! [OSRM](https://project-osrm.org/) routing service for one source and many
//! destinations, and returns the destinations ranked from fastest to slowest.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fastroutes::{Coordinate, RouteAggregator, RouteClient};
//!
//! let client = RouteClient::new()?;
//! let aggregator = RouteAggregator::new(client);
//!
//! let source: Coordinate = "13.388860,52.517037".parse()?;
//! let destinations = vec![
//!     "13.397634,52.529407".parse()?,
//!     "13.428555,52.523219".parse()?,
//! ];
//!
//! for route in aggregator.fetch_ranked_routes(source, &destinations).await? {
//!     println!("{} {}s {}m", route.destination, route.metric.duration, route.metric.distance);
//! }
//! ```
//!
//! ## Request Model
//!
//! Destinations are queried one at a time, in the order given, so that a
//! whole batch can share a single persistent connection. Every request but
//! the last asks the server to keep the connection open; the last one asks
//! it to close. A batch either succeeds completely or fails with the first
//! error encountered.

pub mod aggregate;
pub mod client;
pub mod coordinate;
pub mod error;
pub mod reply;

// Re-export main types at crate root for convenience
pub use aggregate::{rank_routes, RankedRoute, RouteAggregator, BATCH_TIMEOUT};
pub use client::{RouteClient, RouteClientBuilder, RouteSource, DEFAULT_SERVICE_URL};
pub use coordinate::{Coordinate, CoordinateError};
pub use error::{ErrorKind, Result, RouteError};
pub use reply::{RouteMetric, SUCCESS_CODE};
