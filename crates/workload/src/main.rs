use anyhow::Result;
use sort_churn_config::Config;
use sort_churn_model::{CsvCodec, HeaderPolicy};
use sort_churn_workload::{
    BucketStore, ObjectLocation, Progress, RunSummary, StdoutProgress, SystemClock,
    WorkloadService, cli,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn setup_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.parse()?)
        .from_env_lossy();

    // Status marks own stdout.
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}

async fn run(config: &Config) -> Result<RunSummary> {
    let workload = &config.workload;
    let source = ObjectLocation::new(&workload.source_bucket, &workload.dataset_key);
    let target = ObjectLocation::new(&workload.target_bucket, &workload.dataset_key);

    let mut progress = StdoutProgress::new();
    progress.connecting();
    let store = BucketStore::s3(
        &config.store,
        [source.bucket.as_str(), target.bucket.as_str()],
    )?;
    progress.connected();

    let codec = CsvCodec::new(HeaderPolicy {
        decode_header: workload.decode_header,
        encode_header: workload.encode_header,
    });
    let service = WorkloadService::new(store, codec, SystemClock)
        .with_sort_column(workload.sort_column);

    service
        .run(workload.duration, &source, &target, &mut progress)
        .await
}

fn main() -> Result<()> {
    let config = cli::get_config()?;
    setup_tracing(&config.logging.level)?;
    tracing::debug!(?config, "Full application configuration");

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(run(&config)) {
        tracing::error!("Workload finished with an error: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
