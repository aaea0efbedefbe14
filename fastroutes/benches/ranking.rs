use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use fastroutes::{rank_routes, Coordinate, RankedRoute, RouteMetric};

/// Generate routes with scrambled durations and frequent duration ties.
fn create_routes(count: usize) -> Vec<RankedRoute> {
    (0..count)
        .map(|i| {
            let destination = Coordinate::new(13.0 + i as f64 / 1000.0, 52.5);
            RankedRoute {
                destination: destination.to_string(),
                metric: RouteMetric {
                    distance: ((i * 7919) % 50_000) as f64,
                    duration: ((i * 104_729) % 600) as f64,
                },
            }
        })
        .collect()
}

fn bench_rank_routes(c: &mut Criterion) {
    let routes = create_routes(1000);

    c.bench_function("rank_1000_routes", |b| {
        b.iter_batched(
            || routes.clone(),
            |mut routes| {
                rank_routes(&mut routes);
                black_box(routes)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_coordinate_format(c: &mut Criterion) {
    let coordinate = Coordinate::new(13.388860, 52.517037);

    c.bench_function("coordinate_to_string", |b| {
        b.iter(|| black_box(black_box(coordinate).to_string()));
    });
}

fn bench_coordinate_parse(c: &mut Criterion) {
    c.bench_function("coordinate_parse", |b| {
        b.iter(|| {
            black_box(
                black_box("13.388860,52.517037")
                    .parse::<Coordinate>()
                    .unwrap(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_rank_routes,
    bench_coordinate_format,
    bench_coordinate_parse,
);
criterion_main!(benches);
