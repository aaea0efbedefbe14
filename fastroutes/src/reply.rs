//! Routing service reply format and validation.
//!
//! The service answers every route query with a JSON object:
//!
//! ```json
//! {"code": "Ok", "routes": [{"distance": 1886.8, "duration": 260.3}]}
//! ```
//!
//! Error replies carry a non-`"Ok"` code and a human readable `message`.
//! Fields not listed here (`waypoints`, `legs`, `weight`, ...) are ignored.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Status code the service uses for a successful query.
pub const SUCCESS_CODE: &str = "Ok";

/// Distance and duration of a single route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetric {
    /// Distance in meters.
    pub distance: f64,
    /// Travel duration in seconds.
    pub duration: f64,
}

/// Reply body of a route query.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ServiceReply {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub routes: Vec<RouteMetric>,
}

/// Check that a reply reports success and holds exactly one route.
///
/// A single source/destination query must produce one route; zero or
/// several routes are both rejected.
pub(crate) fn validate_reply(reply: &ServiceReply) -> Result<()> {
    if reply.code != SUCCESS_CODE {
        return Err(RouteError::Api {
            code: reply.code.clone(),
            message: reply.message.clone(),
        });
    }

    if reply.routes.len() != 1 {
        return Err(RouteError::RouteCount {
            count: reply.routes.len(),
        });
    }

    Ok(())
}
