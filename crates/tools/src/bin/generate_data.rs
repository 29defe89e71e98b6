use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let data_dir = &config.data_dir;
    let qualities = config.qualities.iter().copied();
    std::fs::create_dir_all(data_dir)?;
    for path in sort_churn_model::generate_data(data_dir, qualities)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Write synthetic `data_{rows}.csv` datasets without a header row.
#[derive(Clone, Debug, Parser)]
#[command()]
struct Config {
    /// Output directory; existing files are kept.
    #[arg()]
    data_dir: std::path::PathBuf,
    /// Row counts, one file per value.
    #[arg(required = true)]
    qualities: Vec<usize>,
}
