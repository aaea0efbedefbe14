use anyhow::{Context, Result};
use fastroutes::{Coordinate, RankedRoute, RouteAggregator, RouteClient};
use serde::Serialize;

#[derive(Serialize)]
struct RankResponse {
    source: Coordinate,
    routes: Vec<RankedRoute>,
}

pub async fn run(
    client: RouteClient,
    src: Coordinate,
    dst: Vec<Coordinate>,
    json: bool,
) -> Result<()> {
    let routes = RouteAggregator::new(client)
        .fetch_ranked_routes(src, &dst)
        .await
        .context("Failed to rank routes")?;

    if json {
        let response = RankResponse {
            source: src,
            routes,
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    println!("Source: {}", src);
    println!(
        "{:>4}  {:<24} {:>12} {:>12}",
        "RANK", "DESTINATION", "DURATION (s)", "DISTANCE (m)"
    );
    println!("{}", "-".repeat(56));

    for (i, route) in routes.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:>12.1} {:>12.1}",
            i + 1,
            route.destination,
            route.metric.duration,
            route.metric.distance
        );
    }

    Ok(())
}
