use sort_churn_model::{CsvCodec, HeaderPolicy, generate_dataset};
use sort_churn_workload::{BucketStore, ObjectLocation, ObjectStore, SystemClock, WorkloadService};

pub type InMemoryService = WorkloadService<BucketStore, CsvCodec, SystemClock>;

/// A workload wired to in-memory buckets, pre-seeded with a synthetic
/// dataset, plus the runtime to drive it.
pub struct Stand {
    pub runtime: tokio::runtime::Runtime,
    pub service: InMemoryService,
    pub source: ObjectLocation,
    pub target: ObjectLocation,
}

impl Stand {
    pub const SOURCE_BUCKET: &'static str = "bench-source";
    pub const TARGET_BUCKET: &'static str = "bench-target";
    pub const DATASET_KEY: &'static str = "dataset.csv";
    const SEED: u64 = 0x5eed;

    pub fn new(rows: usize, policy: HeaderPolicy) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let store = BucketStore::in_memory([Self::SOURCE_BUCKET, Self::TARGET_BUCKET]);
        let source = ObjectLocation::new(Self::SOURCE_BUCKET, Self::DATASET_KEY);
        let target = ObjectLocation::new(Self::TARGET_BUCKET, Self::DATASET_KEY);

        // Seed data carries no header, like the datasets the workload expects.
        let dataset = generate_dataset(rows, Some(Self::SEED))?;
        let seed = CsvCodec::new(HeaderPolicy {
            decode_header: false,
            encode_header: false,
        })
        .encode(&dataset)?;
        let length = seed.len() as u64;
        runtime.block_on(store.put(&source, bytes::Bytes::from(seed), length))?;

        let service = WorkloadService::new(store, CsvCodec::new(policy), SystemClock);
        Ok(Stand {
            runtime,
            service,
            source,
            target,
        })
    }

    pub fn block<O>(&self, f: impl Future<Output = O>) -> O {
        self.runtime.block_on(f)
    }
}
