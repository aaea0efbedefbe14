//! Ranking routes from one source to many destinations.
//!
//! [`RouteAggregator`] queries a [`RouteSource`] once per destination, in
//! the order given, and returns the destinations sorted by travel duration
//! with distance as the tie breaker.

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{timeout_at, Instant};

use crate::client::{RouteClient, RouteSource};
use crate::coordinate::Coordinate;
use crate::error::{Result, RouteError};
use crate::reply::RouteMetric;

/// Deadline shared by all queries of one batch.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// A destination together with the route metric to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoute {
    /// Canonical string form of the destination coordinate.
    pub destination: String,
    #[serde(flatten)]
    pub metric: RouteMetric,
}

/// Fetches routes for a batch of destinations and ranks them fastest first.
#[derive(Debug, Clone)]
pub struct RouteAggregator<S = RouteClient> {
    client: S,
    timeout: Duration,
}

impl<S: RouteSource> RouteAggregator<S> {
    /// Create an aggregator using [`BATCH_TIMEOUT`] as batch deadline.
    pub fn new(client: S) -> Self {
        Self {
            client,
            timeout: BATCH_TIMEOUT,
        }
    }

    /// Override the batch deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Deadline applied to a whole batch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The underlying route source.
    pub fn client(&self) -> &S {
        &self.client
    }

    /// Fetch routes from `source` to every destination and rank them.
    ///
    /// Queries run one after the other. All but the last request keep the
    /// connection alive so the batch can reuse it; the last one closes it.
    /// The deadline covers the whole batch and is not reset per query.
    ///
    /// The result has one entry per destination, sorted by ascending
    /// duration, then ascending distance. An empty `destinations` slice
    /// yields an empty result without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; remaining destinations are not
    /// queried and no partial ranking is returned. Returns
    /// [`RouteError::DeadlineElapsed`] if the deadline passes mid-batch.
    pub async fn fetch_ranked_routes(
        &self,
        source: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<RankedRoute>> {
        let deadline = Instant::now() + self.timeout;
        let mut routes = Vec::with_capacity(destinations.len());

        for (i, &destination) in destinations.iter().enumerate() {
            let keep_alive = i + 1 < destinations.len();

            let metric = timeout_at(
                deadline,
                self.client.fetch_route(source, destination, keep_alive),
            )
            .await
            .map_err(|_| RouteError::DeadlineElapsed(self.timeout))??;

            routes.push(RankedRoute {
                destination: destination.to_string(),
                metric,
            });
        }

        rank_routes(&mut routes);
        Ok(routes)
    }
}

/// Sort routes by ascending duration, then ascending distance.
///
/// The sort is stable, so routes equal on both keys keep their relative order.
pub fn rank_routes(routes: &mut [RankedRoute]) {
    routes.sort_by(compare_routes);
}

fn compare_routes(a: &RankedRoute, b: &RankedRoute) -> Ordering {
    a.metric
        .duration
        .total_cmp(&b.metric.duration)
        .then_with(|| a.metric.distance.total_cmp(&b.metric.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    /// Route source answering from a table keyed by destination string.
    #[derive(Default)]
    struct FakeSource {
        metrics: HashMap<String, RouteMetric>,
        delay: Option<Duration>,
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl FakeSource {
        fn with_routes(routes: &[(Coordinate, f64, f64)]) -> Self {
            let metrics = routes
                .iter()
                .map(|&(c, distance, duration)| {
                    (c.to_string(), RouteMetric { distance, duration })
                })
                .collect();
            Self {
                metrics,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RouteSource for FakeSource {
        fn fetch_route(
            &self,
            _source: Coordinate,
            destination: Coordinate,
            keep_alive: bool,
        ) -> impl Future<Output = Result<RouteMetric>> + Send {
            async move {
                let key = destination.to_string();
                self.calls.lock().unwrap().push((key.clone(), keep_alive));

                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }

                self.metrics.get(&key).copied().ok_or(RouteError::Api {
                    code: "NoRoute".to_string(),
                    message: "Impossible route between points".to_string(),
                })
            }
        }
    }

    const SOURCE: Coordinate = Coordinate::new(13.388860, 52.517037);

    fn route(destination: &str, distance: f64, duration: f64) -> RankedRoute {
        RankedRoute {
            destination: destination.to_string(),
            metric: RouteMetric { distance, duration },
        }
    }

    #[test]
    fn test_rank_routes_by_duration_then_distance() {
        let mut routes = vec![
            route("a", 500.0, 30.0),
            route("b", 900.0, 10.0),
            route("c", 100.0, 30.0),
            route("d", 100.0, 20.0),
        ];
        rank_routes(&mut routes);

        let order: Vec<_> = routes.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_rank_routes_is_stable_on_ties() {
        let mut routes = vec![
            route("first", 100.0, 10.0),
            route("second", 100.0, 10.0),
            route("fast", 100.0, 5.0),
        ];
        rank_routes(&mut routes);

        let order: Vec<_> = routes.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(order, vec!["fast", "first", "second"]);
    }

    #[tokio::test]
    async fn test_empty_destinations() {
        let aggregator = RouteAggregator::new(FakeSource::default());
        let routes = aggregator.fetch_ranked_routes(SOURCE, &[]).await.unwrap();
        assert!(routes.is_empty());
        assert!(aggregator.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_ranks_and_pairs_destinations() {
        let near = Coordinate::new(13.397634, 52.529407);
        let far = Coordinate::new(14.397634, 53.529407);
        let source = FakeSource::with_routes(&[(near, 1886.8, 260.3), (far, 150_000.0, 6400.0)]);
        let aggregator = RouteAggregator::new(source);

        let routes = aggregator
            .fetch_ranked_routes(SOURCE, &[far, near])
            .await
            .unwrap();

        assert_eq!(
            routes,
            vec![
                route("13.397634,52.529407", 1886.8, 260.3),
                route("14.397634,53.529407", 150_000.0, 6400.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_keep_alive_hints() {
        for size in 1..=4 {
            let destinations: Vec<_> = (0..size)
                .map(|i| Coordinate::new(10.0 + i as f64, 50.0))
                .collect();
            let table: Vec<_> = destinations
                .iter()
                .map(|&c| (c, 1000.0, 100.0))
                .collect();
            let aggregator = RouteAggregator::new(FakeSource::with_routes(&table));

            aggregator
                .fetch_ranked_routes(SOURCE, &destinations)
                .await
                .unwrap();

            let calls = aggregator.client().calls();
            assert_eq!(calls.len(), size);
            for (i, (destination, keep_alive)) in calls.iter().enumerate() {
                assert_eq!(destination, &destinations[i].to_string(), "queried in order");
                assert_eq!(*keep_alive, i + 1 < size, "batch size {size}, query {i}");
            }
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_batch() {
        let a = Coordinate::new(1.0, 1.0);
        let unroutable = Coordinate::new(2.0, 2.0);
        let c = Coordinate::new(3.0, 3.0);
        let source = FakeSource::with_routes(&[(a, 10.0, 1.0), (c, 30.0, 3.0)]);
        let aggregator = RouteAggregator::new(source);

        let result = aggregator
            .fetch_ranked_routes(SOURCE, &[a, unroutable, c])
            .await;

        assert!(matches!(result, Err(RouteError::Api { .. })));
        // The destination after the failing one is never queried
        assert_eq!(aggregator.client().calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_covers_whole_batch() {
        let destinations = [
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(3.0, 3.0),
        ];
        let table: Vec<_> = destinations.iter().map(|&c| (c, 1.0, 1.0)).collect();
        let mut source = FakeSource::with_routes(&table);
        // Each query fits the deadline on its own, the batch does not.
        source.delay = Some(Duration::from_millis(40));

        let aggregator = RouteAggregator::new(source).with_timeout(Duration::from_millis(100));
        let result = aggregator.fetch_ranked_routes(SOURCE, &destinations).await;

        match result {
            Err(RouteError::DeadlineElapsed(timeout)) => {
                assert_eq!(timeout, Duration::from_millis(100))
            }
            other => panic!("Expected DeadlineElapsed, got {:?}", other),
        }
        assert_eq!(aggregator.client().calls().len(), 3);
    }

    #[test]
    fn test_ranked_route_serialize_flat() {
        let json = serde_json::to_value(route("13.397634,52.529407", 1886.8, 260.3)).unwrap();
        assert_eq!(json["destination"], "13.397634,52.529407");
        assert_eq!(json["distance"], 1886.8);
        assert_eq!(json["duration"], 260.3);
    }
}
