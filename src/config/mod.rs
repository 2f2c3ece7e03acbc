//! Application configuration

use serde::Deserialize;

use crate::infrastructure::services::{DEFAULT_MAX_FLOW_FILES, DEFAULT_TOP_N};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Defaults for one analysis run; the CLI overrides any of these.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bucket holding the CUR export.
    pub cur_bucket: Option<String>,
    pub cur_prefix: String,
    /// Bucket holding VPC flow logs.
    pub flow_bucket: Option<String>,
    pub flow_prefix: String,
    /// How many top cost groups to analyze.
    pub top_n: usize,
    /// Bound on flow log files scanned per run.
    pub max_flow_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cur_bucket: None,
            cur_prefix: "cur-reports/".to_string(),
            flow_bucket: None,
            flow_prefix: "vpc-flow-logs/".to_string(),
            top_n: DEFAULT_TOP_N,
            max_flow_files: DEFAULT_MAX_FLOW_FILES,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config/default", "config/local")
    }

    /// Layer the given files (both optional) under the `DTO`-prefixed
    /// environment. A file that exists but fails to parse is an error, not
    /// a silent fallback to defaults.
    fn load_from(default_file: &str, local_file: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(default_file).required(false))
            .add_source(config::File::with_name(local_file).required(false))
            .add_source(
                config::Environment::with_prefix("DTO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
