use anyhow::Context;
use clap::Parser;
use sort_churn_config::StoreConfig;
use sort_churn_model::{CsvCodec, HeaderPolicy, generate_dataset};
use sort_churn_workload::{BucketStore, ObjectLocation, ObjectStore};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // The workload reads without a header, so neither do we write one.
    let codec = CsvCodec::new(HeaderPolicy {
        decode_header: false,
        encode_header: false,
    });
    let body = match &config.from {
        Some(path) => {
            let body = std::fs::read(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let dataset = codec
                .decode(&body)
                .with_context(|| format!("{} is not a usable dataset", path.display()))?;
            tracing::info!(rows = dataset.len(), columns = dataset.width(), "Dataset loaded");
            body
        }
        None => {
            let dataset = generate_dataset(config.rows, config.seed)?;
            tracing::info!(rows = dataset.len(), "Dataset generated");
            codec.encode(&dataset)?
        }
    };

    let store_config = StoreConfig {
        host: config.store_host.clone(),
        access_key: config.access_key.clone(),
        secret_key: config.secret_key.clone(),
        region: config.region.clone(),
        secure: config.secure,
    };
    let store = BucketStore::s3(&store_config, [config.bucket.as_str()])?;
    let location = ObjectLocation::new(&config.bucket, &config.dataset_key);

    let length = body.len() as u64;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(store.put(&location, bytes::Bytes::from(body), length))
        .with_context(|| format!("cannot upload {location}"))?;

    tracing::info!(%location, bytes = length, "Dataset uploaded");
    Ok(())
}

/// Upload a synthetic (or local) CSV dataset for the workload to churn on.
#[derive(Clone, Debug, Parser)]
#[command()]
struct Config {
    /// Store host address, host[:port]
    #[arg()]
    store_host: String,
    #[arg()]
    access_key: String,
    #[arg()]
    secret_key: String,
    #[arg()]
    bucket: String,
    #[arg()]
    dataset_key: String,
    /// Number of synthetic rows to generate.
    #[arg(long, default_value_t = 10_000)]
    rows: usize,
    /// Seed for repeatable synthetic data.
    #[arg(long)]
    seed: Option<u64>,
    /// Upload this CSV file instead of generating rows.
    #[arg(long, conflicts_with_all = ["rows", "seed"])]
    from: Option<std::path::PathBuf>,
    #[arg(long, default_value = "us-east-1")]
    region: String,
    /// Use https.
    #[arg(long)]
    secure: bool,
}
