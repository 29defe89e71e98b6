use std::fmt;
use std::time::Instant;

use bytes::Bytes;
use sort_churn_model::Dataset;

use super::service::RunSummary;

/// Where an object lives: a bucket and a key inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        ObjectLocation {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// An open object body. Dropping the reader releases the underlying
/// connection, whether or not the body was read.
pub trait ObjectReader: Send {
    fn read_all(&mut self) -> impl Future<Output = anyhow::Result<Bytes>> + Send;
}

/// A contract for the object store the workload reads from and writes to.
pub trait ObjectStore: Send + Sync {
    type Reader: ObjectReader;

    fn get(
        &self,
        location: &ObjectLocation,
    ) -> impl Future<Output = anyhow::Result<Self::Reader>> + Send;

    /// Stores `data` at `location`. `length` must equal `data.len()`.
    fn put(
        &self,
        location: &ObjectLocation,
        data: Bytes,
        length: u64,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// A contract for turning object bytes into a dataset and back.
pub trait TabularCodec {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Dataset>;

    fn encode(&self, dataset: &Dataset) -> anyhow::Result<Vec<u8>>;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

/// Status callbacks for whoever is watching the run.
pub trait Progress {
    fn connecting(&mut self) {}

    fn connected(&mut self) {}

    fn running(&mut self) {}

    /// Called once per cycle attempt, including the one that finds the
    /// deadline passed.
    fn tick(&mut self) {}

    fn finished(&mut self, _summary: &RunSummary) {}
}
