use sort_churn_model::{CsvCodec, Dataset};

use crate::application::ports::TabularCodec;

impl TabularCodec for CsvCodec {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Dataset> {
        CsvCodec::decode(self, bytes)
    }

    fn encode(&self, dataset: &Dataset) -> anyhow::Result<Vec<u8>> {
        CsvCodec::encode(self, dataset)
    }
}
