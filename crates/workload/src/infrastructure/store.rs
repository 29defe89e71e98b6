use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore as Backend, PutPayload};
use sort_churn_config::StoreConfig;

use crate::application::ports::{ObjectLocation, ObjectReader, ObjectStore};

/// An adapter that implements the `ObjectStore` port on top of one
/// `object_store` backend per bucket.
#[derive(Default)]
pub struct BucketStore {
    buckets: HashMap<String, Arc<dyn Backend>>,
}

impl BucketStore {
    /// Builds S3 clients for every bucket the run touches.
    ///
    /// Requests are path-style so that MinIO and similar services work
    /// without wildcard DNS.
    pub fn s3<'a>(
        config: &StoreConfig,
        buckets: impl IntoIterator<Item = &'a str>,
    ) -> anyhow::Result<Self> {
        let mut store = BucketStore::default();
        for bucket in buckets {
            if store.buckets.contains_key(bucket) {
                continue;
            }
            let client = AmazonS3Builder::new()
                .with_endpoint(config.endpoint())
                .with_allow_http(!config.secure)
                .with_region(&config.region)
                .with_access_key_id(&config.access_key)
                .with_secret_access_key(&config.secret_key)
                .with_bucket_name(bucket)
                .with_virtual_hosted_style_request(false)
                .build()
                .with_context(|| format!("cannot configure S3 client for bucket {bucket}"))?;
            tracing::debug!(bucket, endpoint = %config.endpoint(), "S3 client configured");
            store = store.with_bucket(bucket, Arc::new(client));
        }
        Ok(store)
    }

    /// Backs every bucket with its own in-memory store.
    pub fn in_memory<'a>(buckets: impl IntoIterator<Item = &'a str>) -> Self {
        buckets
            .into_iter()
            .fold(BucketStore::default(), |store, bucket| {
                if store.buckets.contains_key(bucket) {
                    store
                } else {
                    store.with_bucket(bucket, Arc::new(InMemory::new()))
                }
            })
    }

    pub fn with_bucket(mut self, bucket: &str, backend: Arc<dyn Backend>) -> Self {
        self.buckets.insert(bucket.to_owned(), backend);
        self
    }

    fn bucket(&self, bucket: &str) -> anyhow::Result<&Arc<dyn Backend>> {
        self.buckets
            .get(bucket)
            .with_context(|| format!("bucket {bucket} is not configured"))
    }
}

/// Streaming body of a fetched object.
pub struct ObjectStream {
    stream: Option<BoxStream<'static, object_store::Result<Bytes>>>,
    size_hint: usize,
}

impl ObjectReader for ObjectStream {
    async fn read_all(&mut self) -> anyhow::Result<Bytes> {
        let mut stream = self
            .stream
            .take()
            .context("object body was already consumed")?;
        let mut body = BytesMut::with_capacity(self.size_hint);
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
        }
        Ok(body.freeze())
    }
}

impl ObjectStore for BucketStore {
    type Reader = ObjectStream;

    async fn get(&self, location: &ObjectLocation) -> anyhow::Result<ObjectStream> {
        let backend = self.bucket(&location.bucket)?;
        let result = backend.get(&Path::from(location.key.as_str())).await?;
        let size_hint = result.meta.size as usize;
        Ok(ObjectStream {
            stream: Some(result.into_stream()),
            size_hint,
        })
    }

    async fn put(&self, location: &ObjectLocation, data: Bytes, length: u64) -> anyhow::Result<()> {
        anyhow::ensure!(
            data.len() as u64 == length,
            "declared length {length} does not match the {} byte payload",
            data.len()
        );
        let backend = self.bucket(&location.bucket)?;
        backend
            .put(&Path::from(location.key.as_str()), PutPayload::from(data))
            .await?;
        Ok(())
    }
}
