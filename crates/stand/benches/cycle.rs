use sort_churn_model::{CsvCodec, Direction, HeaderPolicy, generate_dataset};
use sort_churn_stand::Stand;

use std::time::Duration;

const BENCH_NAME: &str = "cycle";
const BENCH_GROUP_NAME: &str = const_format::formatc!("bench.{BENCH_NAME}");
const SORT_GROUP_NAME: &str = const_format::formatc!("bench.{BENCH_NAME}.sort");

const QUALITIES: [usize; 4] = [500, 5_000, 50_000, 200_000];

fn cycle_bench_group(c: &mut criterion::Criterion) {
    let mut group = c.benchmark_group(BENCH_GROUP_NAME);
    for quality in QUALITIES {
        let stand = Stand::new(quality, HeaderPolicy::default()).unwrap();
        group.throughput(criterion::Throughput::Elements(quality as u64));
        let bench_id = criterion::BenchmarkId::new(BENCH_NAME, quality);
        group.bench_function(bench_id, |b| {
            let mut direction = Direction::Ascending;
            b.to_async(&stand.runtime).iter(|| {
                let cycle_direction = direction;
                direction = direction.flipped();
                let stand = &stand;
                async move {
                    stand
                        .service
                        .cycle(&stand.source, &stand.target, cycle_direction)
                        .await
                        .unwrap()
                }
            });
        });
    }
    group.finish();
}

fn sort_bench_group(c: &mut criterion::Criterion) {
    let codec = CsvCodec::new(HeaderPolicy {
        decode_header: false,
        encode_header: false,
    });
    let mut group = c.benchmark_group(SORT_GROUP_NAME);
    for quality in QUALITIES {
        let dataset = generate_dataset(quality, Some(quality as u64)).unwrap();
        let encoded = codec.encode(&dataset).unwrap();
        group.throughput(criterion::Throughput::Bytes(encoded.len() as u64));

        group.bench_function(criterion::BenchmarkId::new("decode", quality), |b| {
            b.iter(|| codec.decode(&encoded).unwrap());
        });
        group.bench_function(criterion::BenchmarkId::new("sort", quality), |b| {
            b.iter(|| dataset.sorted_by_column(0, Direction::Descending).unwrap());
        });
        group.bench_function(criterion::BenchmarkId::new("encode", quality), |b| {
            b.iter(|| codec.encode(&dataset).unwrap());
        });
    }
    group.finish();
}

criterion::criterion_group! {
    name = cycle;
    config = criterion::Criterion::default()
        .sample_size(30)
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(20));
    targets =
        cycle_bench_group,
        sort_bench_group,
}

criterion::criterion_main!(cycle);
