use anyhow::{Context, Result};
use fastroutes::{Coordinate, RouteClient};
use serde::Serialize;

#[derive(Serialize)]
struct RouteResponse {
    source: Coordinate,
    destination: Coordinate,
    distance: f64,
    duration: f64,
}

pub async fn run(client: RouteClient, src: Coordinate, dst: Coordinate, json: bool) -> Result<()> {
    // Single query, nothing to keep the connection open for
    let metric = client
        .fetch_route(src, dst, false)
        .await
        .context("Failed to fetch route")?;

    if json {
        let response = RouteResponse {
            source: src,
            destination: dst,
            distance: metric.distance,
            duration: metric.duration,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{:.1}s {:.1}m", metric.duration, metric.distance);
    }

    Ok(())
}
