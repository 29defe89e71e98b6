use anyhow::Context;

use crate::dataset::{Dataset, Field, Row};

/// Header handling on both sides of the codec.
///
/// The default decodes without a header but writes one, so a dataset written
/// back to its own source gains a header line that the next decode reads as
/// data. Set `encode_header` to `false` to keep the format stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPolicy {
    pub decode_header: bool,
    pub encode_header: bool,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        HeaderPolicy {
            decode_header: false,
            encode_header: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    UInt,
    Float,
    Text,
}

impl ColumnKind {
    /// Picks the narrowest kind that parses every present value of a column.
    fn infer<'a>(values: impl Iterator<Item = &'a str> + Clone) -> Self {
        [ColumnKind::Int, ColumnKind::UInt, ColumnKind::Float]
            .into_iter()
            .find(|kind| values.clone().all(|value| kind.accepts(value)))
            .unwrap_or(ColumnKind::Text)
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            ColumnKind::Int => value.parse::<i64>().is_ok(),
            ColumnKind::UInt => value.parse::<u64>().is_ok(),
            ColumnKind::Float => value.parse::<f64>().is_ok(),
            ColumnKind::Text => true,
        }
    }

    fn field(self, value: &str) -> Field {
        if value.is_empty() {
            return Field::Missing;
        }
        let field = match self {
            ColumnKind::Int => value.parse().ok().map(Field::Int),
            ColumnKind::UInt => value.parse().ok().map(Field::UInt),
            ColumnKind::Float => value.parse().ok().map(Field::Float),
            ColumnKind::Text => None,
        };
        field.unwrap_or_else(|| Field::Text(value.to_owned()))
    }
}

/// CSV reader/writer for [`Dataset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec {
    policy: HeaderPolicy,
}

impl CsvCodec {
    pub fn new(policy: HeaderPolicy) -> Self {
        CsvCodec { policy }
    }

    pub fn policy(&self) -> HeaderPolicy {
        self.policy
    }

    /// Parses CSV bytes into a typed dataset.
    ///
    /// Each column takes the narrowest of `Int`, `UInt`, `Float` or `Text`
    /// that fits all of its non-empty values. `nan` and `inf` are floats, and
    /// empty cells never promote an integer column.
    ///
    /// The first record fixes the column count. Wider records are an error,
    /// narrower ones are padded with missing cells.
    pub fn decode(&self, bytes: &[u8]) -> anyhow::Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.policy.decode_header)
            .flexible(true)
            .from_reader(bytes);

        let mut width = None;
        if self.policy.decode_header {
            let headers = reader.headers().context("cannot read header record")?;
            if !headers.is_empty() {
                width = Some(headers.len());
            }
        }

        let mut records = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("malformed record {}", index + 1))?;
            let width = *width.get_or_insert(record.len());
            if record.len() > width {
                anyhow::bail!(
                    "record {} has {} fields, expected {width}",
                    index + 1,
                    record.len()
                );
            }
            records.push(record);
        }

        let Some(width) = width else {
            anyhow::bail!("no columns to parse");
        };

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|column| {
                ColumnKind::infer(
                    records
                        .iter()
                        .filter_map(|record| record.get(column))
                        .filter(|value| !value.is_empty()),
                )
            })
            .collect();

        let rows: Vec<Row> = records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .zip(&kinds)
                    .map(|(value, kind)| kind.field(value))
                    .collect()
            })
            .collect();

        Dataset::new(width, rows)
    }

    /// Writes a dataset as `\n`-terminated CSV, prefixed by a header of
    /// column indices when the policy asks for one.
    pub fn encode(&self, dataset: &Dataset) -> anyhow::Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if self.policy.encode_header {
            writer.write_record((0..dataset.width()).map(|column| column.to_string()))?;
        }
        for row in dataset.rows() {
            for field in row {
                writer.write_field(field.to_string())?;
            }
            writer.write_record(None::<&[u8]>)?;
        }

        writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("cannot flush encoded dataset: {}", err.error()))
    }
}
