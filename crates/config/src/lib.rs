mod serde_duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// A single, unified struct holding all application settings.
///
/// Layers, lowest priority first: built-in defaults, an optional TOML file,
/// `SORT_CHURN_*` environment variables (`__` separates sections), and
/// whatever the caller merges on top of [`Config::figment`].
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub workload: WorkloadConfig,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_owned(),
        }
    }
}

/// Connection settings for the S3-compatible store.
#[derive(Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `host:port` of the store, without scheme.
    pub host: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Use https instead of plain http.
    pub secure: bool,
}

impl StoreConfig {
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            host: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: "us-east-1".to_owned(),
            secure: false,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("secure", &self.secure)
            .finish()
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct WorkloadConfig {
    #[serde(with = "serde_duration")]
    pub duration: std::time::Duration,
    pub source_bucket: String,
    pub target_bucket: String,
    pub dataset_key: String,
    /// Column the rows are ordered by.
    pub sort_column: usize,
    /// Treat the first record of the fetched object as a header.
    pub decode_header: bool,
    /// Prefix the written object with a header of column indices.
    pub encode_header: bool,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            duration: std::time::Duration::ZERO,
            source_bucket: String::new(),
            target_bucket: String::new(),
            dataset_key: String::new(),
            sort_column: 0,
            decode_header: false,
            encode_header: true,
        }
    }
}

impl Config {
    pub const ENV_PREFIX: &'static str = "SORT_CHURN_";

    /// Defaults, then `config_file` if given, then the environment.
    pub fn figment(config_file: Option<&std::path::Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(config_file) = config_file {
            figment = figment.merge(Toml::file(config_file));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Extracts and validates the final configuration.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("store.host", &self.store.host),
            ("workload.source_bucket", &self.workload.source_bucket),
            ("workload.target_bucket", &self.workload.target_bucket),
            ("workload.dataset_key", &self.workload.dataset_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("missing required setting `{name}`");
            }
        }
        if self.store.host.contains("://") {
            anyhow::bail!(
                "`store.host` must be host[:port] without a scheme, got {}",
                self.store.host
            );
        }
        Ok(())
    }
}
