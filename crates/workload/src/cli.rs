use clap::Parser;
use figment::Figment;
use sort_churn_config::Config;

/// Repeatedly fetch a CSV dataset, sort it by one column in alternating
/// directions, and store the result, for a fixed amount of time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Duration of work, sec.
    #[arg(allow_negative_numbers = true)]
    pub time: i64,
    /// Store host address, host[:port]
    pub store_host: String,
    /// Store access key
    pub access_key: String,
    /// Store secret key
    pub secret_key: String,
    /// Name of a source bucket
    pub source_bucket: String,
    /// Name of a target bucket
    pub target_bucket: String,
    /// Name of a dataset file
    pub dataset_name: String,

    /// Extra settings in TOML; positional arguments take precedence.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Column to sort by, zero-based.
    #[arg(long)]
    pub sort_column: Option<usize>,
    /// Write the sorted dataset without a header row.
    #[arg(long)]
    pub no_output_header: bool,
}

impl Cli {
    /// Layers the command line over the file and environment settings.
    pub fn figment(&self) -> anyhow::Result<Figment> {
        if let Some(config_file) = &self.config {
            anyhow::ensure!(
                config_file.is_file(),
                "config file not found: {}",
                config_file.display()
            );
        }

        let mut figment = Config::figment(self.config.as_deref())
            .merge(("workload.duration", self.time))
            .merge(("store.host", &self.store_host))
            .merge(("store.access_key", &self.access_key))
            .merge(("store.secret_key", &self.secret_key))
            .merge(("workload.source_bucket", &self.source_bucket))
            .merge(("workload.target_bucket", &self.target_bucket))
            .merge(("workload.dataset_key", &self.dataset_name));

        if let Some(level) = &self.log_level {
            figment = figment.merge(("logging.level", level));
        }
        if let Some(sort_column) = self.sort_column {
            figment = figment.merge(("workload.sort_column", sort_column));
        }
        if self.no_output_header {
            figment = figment.merge(("workload.encode_header", false));
        }
        Ok(figment)
    }

    pub fn into_config(self) -> anyhow::Result<Config> {
        Config::from_figment(&self.figment()?)
    }
}

/// Parses the process arguments into the final configuration.
pub fn get_config() -> anyhow::Result<Config> {
    Cli::parse().into_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: [&str; 8] = [
        "sort-churn",
        "30",
        "localhost:9000",
        "minioadmin",
        "miniosecret",
        "raw",
        "sorted",
        "dataset.csv",
    ];

    #[test]
    fn positional_arguments_fill_the_config() -> anyhow::Result<()> {
        let config = Cli::try_parse_from(ARGS)?.into_config()?;

        assert_eq!(config.workload.duration, std::time::Duration::from_secs(30));
        assert_eq!(config.store.host, "localhost:9000");
        assert_eq!(config.store.access_key, "minioadmin");
        assert_eq!(config.store.secret_key, "miniosecret");
        assert_eq!(config.workload.source_bucket, "raw");
        assert_eq!(config.workload.target_bucket, "sorted");
        assert_eq!(config.workload.dataset_key, "dataset.csv");
        assert!(config.workload.encode_header);
        Ok(())
    }

    #[test]
    fn negative_time_is_accepted_and_clamped() -> anyhow::Result<()> {
        let mut args = ARGS;
        args[1] = "-5";
        let config = Cli::try_parse_from(args)?.into_config()?;
        assert_eq!(config.workload.duration, std::time::Duration::ZERO);
        Ok(())
    }

    #[test]
    fn optional_flags_override_defaults() -> anyhow::Result<()> {
        let args = ARGS.into_iter().chain([
            "--sort-column",
            "2",
            "--no-output-header",
            "--log-level",
            "debug",
        ]);
        let config = Cli::try_parse_from(args)?.into_config()?;
        assert_eq!(config.workload.sort_column, 2);
        assert!(!config.workload.encode_header);
        assert_eq!(config.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(ARGS[..7].iter().copied()).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ARGS
            .into_iter()
            .chain(["--config", "/nonexistent/sort-churn.toml"]);
        let err = Cli::try_parse_from(args).unwrap().into_config().unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
