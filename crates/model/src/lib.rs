use anyhow::Context;

pub mod bulk_data;
pub mod codec;
pub mod dataset;

pub use codec::{CsvCodec, HeaderPolicy};
pub use dataset::{Dataset, Direction, Field, Row};

/// Writes one `data_{rows}.csv` file per requested size into `out_dir`.
///
/// Existing files are left untouched.
pub fn generate_data(
    out_dir: &std::path::Path,
    qualities: impl Iterator<Item = usize>,
) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let mut written = Vec::new();
    for quality in qualities {
        let file_name = format!("data_{quality}.csv");
        let file_path = out_dir.join(file_name.as_str());
        let file = match std::fs::File::create_new(&file_path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("cannot create {}", file_path.display()));
            }
        };
        write_data_file(&file, quality)?;
        written.push(file_path);
    }
    Ok(written)
}

fn write_data_file(file: &std::fs::File, quality: usize) -> anyhow::Result<()> {
    let mut csv_file = csv::Writer::from_writer(file);
    let transactions = bulk_data::BulkDataGenerator::new();
    for transaction in transactions.take(quality) {
        transaction.serialize_csv(&mut csv_file)?;
    }
    csv_file.flush()?;
    Ok(())
}

/// Builds an in-memory dataset of `rows` synthetic transactions.
pub fn generate_dataset(rows: usize, seed: Option<u64>) -> anyhow::Result<Dataset> {
    let generator = match seed {
        Some(seed) => bulk_data::BulkDataGenerator::with_seed(seed),
        None => bulk_data::BulkDataGenerator::new(),
    };
    let rows = generator.take(rows).map(bulk_data::Transaction::into_row).collect();
    Dataset::new(3, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_files_decode_to_requested_sizes() -> anyhow::Result<()> {
        let out_dir = std::env::temp_dir().join(format!("sort-churn-model-{}", std::process::id()));
        std::fs::create_dir_all(&out_dir)?;

        let written = generate_data(&out_dir, [5, 12].into_iter())?;
        assert_eq!(written.len(), 2);

        let codec = CsvCodec::new(HeaderPolicy {
            decode_header: false,
            encode_header: false,
        });
        let dataset = codec.decode(&std::fs::read(out_dir.join("data_12.csv"))?)?;
        assert_eq!(dataset.len(), 12);
        assert_eq!(dataset.width(), 3);

        // Second call keeps existing files.
        assert!(generate_data(&out_dir, [5].into_iter())?.is_empty());

        std::fs::remove_dir_all(&out_dir)?;
        Ok(())
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let out_dir = std::env::temp_dir()
            .join(format!("sort-churn-model-missing-{}", std::process::id()))
            .join("nested");

        let err = generate_data(&out_dir, [5].into_iter()).unwrap_err();
        assert!(err.to_string().contains("cannot create"));
        assert!(!out_dir.exists());
    }

    #[test]
    fn generated_dataset_has_requested_rows() -> anyhow::Result<()> {
        let dataset = generate_dataset(100, Some(3))?;
        assert_eq!(dataset.len(), 100);
        assert_eq!(dataset, generate_dataset(100, Some(3))?);
        Ok(())
    }
}
