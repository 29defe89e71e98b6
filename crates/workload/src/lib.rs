pub mod application;
pub mod cli;
pub mod infrastructure;

pub use application::ports::{Clock, ObjectLocation, ObjectReader, ObjectStore, Progress, TabularCodec};
pub use application::service::{CycleReport, RunSummary, WorkloadService};
pub use infrastructure::clock::SystemClock;
pub use infrastructure::progress::{SilentProgress, StdoutProgress};
pub use infrastructure::store::BucketStore;
