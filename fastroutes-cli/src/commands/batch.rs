use anyhow::{bail, Context, Result};
use csv::StringRecord;
use fastroutes::{Coordinate, RankedRoute, RouteAggregator, RouteClient};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub async fn run(
    client: RouteClient,
    src: Coordinate,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
) -> Result<()> {
    let (headers, rows) = read_destinations(&input, &lat_col, &lon_col)?;
    let destinations: Vec<Coordinate> = rows.iter().map(|(c, _)| *c).collect();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Ranking {} destinations", destinations.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = RouteAggregator::new(client)
        .fetch_ranked_routes(src, &destinations)
        .await;
    pb.finish_and_clear();
    let routes = result.context("Failed to rank routes")?;

    let output_path = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        input.with_file_name(format!("{}_ranked.csv", stem))
    });

    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.extend(["rank", "distance", "duration"]);
    writer.write_record(&new_headers)?;

    for (i, (route, record)) in order_records(&routes, rows).into_iter().enumerate() {
        let mut new_record: Vec<String> = record.iter().map(str::to_string).collect();
        new_record.push((i + 1).to_string());
        new_record.push(route.metric.distance.to_string());
        new_record.push(route.metric.duration.to_string());
        writer.write_record(&new_record)?;
    }

    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

/// Read destination coordinates and their source rows from a CSV file.
fn read_destinations(
    input: &Path,
    lat_col: &str,
    lon_col: &str,
) -> Result<(StringRecord, Vec<(Coordinate, StringRecord)>)> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let lat = record.get(lat_idx).context("Missing latitude")?;
        let lon = record.get(lon_idx).context("Missing longitude")?;
        let coordinate = format!("{},{}", lat, lon)
            .parse::<Coordinate>()
            .with_context(|| format!("Invalid coordinate on row {}", line + 1))?;
        rows.push((coordinate, record));
    }

    if rows.is_empty() {
        bail!("No destinations found in: {}", input.display());
    }

    Ok((headers, rows))
}

/// Pair ranked routes with the CSV rows they came from, in ranked order.
///
/// Rows sharing a coordinate are handed out in input order.
fn order_records(
    routes: &[RankedRoute],
    rows: Vec<(Coordinate, StringRecord)>,
) -> Vec<(&RankedRoute, StringRecord)> {
    let mut by_destination: HashMap<String, VecDeque<StringRecord>> = HashMap::new();
    for (coordinate, record) in rows {
        by_destination
            .entry(coordinate.to_string())
            .or_default()
            .push_back(record);
    }

    routes
        .iter()
        .filter_map(|route| {
            by_destination
                .get_mut(&route.destination)
                .and_then(VecDeque::pop_front)
                .map(|record| (route, record))
        })
        .collect()
}
