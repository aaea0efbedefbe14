use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fastroutes::{Coordinate, RouteClient};
use std::path::PathBuf;
use std::time::Duration;

mod commands;

/// Rank driving routes by travel time using an OSRM routing service
#[derive(Parser)]
#[command(name = "fastroutes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the routing service
    #[arg(long, env = "FASTROUTES_SERVICE_URL", global = true)]
    service_url: Option<String>,

    /// Timeout for a single routing request, in seconds
    #[arg(long, env = "FASTROUTES_REQUEST_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the route between two coordinates
    Route {
        /// Source coordinate as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        src: Coordinate,

        /// Destination coordinate as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        dst: Coordinate,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rank destinations by travel time from a source
    Rank {
        /// Source coordinate as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        src: Coordinate,

        /// Destination coordinate as LAT,LON (repeatable)
        #[arg(long, required = true, allow_hyphen_values = true)]
        dst: Vec<Coordinate>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rank destinations read from a CSV file
    Batch {
        /// Source coordinate as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        src: Coordinate,

        /// Input CSV file with one destination per row
        input: PathBuf,

        /// Output file (defaults to <input>_ranked.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },
}

/// Build a client from the global options.
fn build_client(service_url: Option<String>, timeout: Option<u64>) -> Result<RouteClient> {
    let mut builder = RouteClient::builder();
    if let Some(url) = service_url {
        builder = builder.service_url(url);
    }
    if let Some(secs) = timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to create routing client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = build_client(cli.service_url, cli.timeout)?;

    match cli.command {
        Commands::Route { src, dst, json } => commands::route::run(client, src, dst, json).await,
        Commands::Rank { src, dst, json } => commands::rank::run(client, src, dst, json).await,
        Commands::Batch {
            src,
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(client, src, input, output, lat_col, lon_col).await,
    }
}
