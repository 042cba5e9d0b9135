/// `load_config` module: merges the optional YAML config file and the
/// environment into the settings the CLI runs with.
///
/// Precedence, lowest first: built-in defaults, the YAML file, the
/// `DOCSUM_API_BASE_URL` environment variable, then command-line flags
/// (applied by the caller).
///
/// Accepted YAML:
///
/// ```yaml
/// api:
///   base_url: http://localhost:8000
/// output_dir: ./downloads
/// length: short
/// ```
///
/// Every key is optional.
use anyhow::{Context, Result};
use docsum_core::config::ApiConfig;
use docsum_core::contract::SummaryLength;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub api: ApiConfig,
    pub output_dir: PathBuf,
    pub length: SummaryLength,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            api: ApiConfig::default(),
            output_dir: PathBuf::from("."),
            length: SummaryLength::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    api: Option<ApiSection>,
    output_dir: Option<PathBuf>,
    length: Option<SummaryLength>,
}

#[derive(Debug, Deserialize)]
struct ApiSection {
    base_url: String,
}

/// Loads `path` (when given) and applies environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let mut config = CliConfig::default();

    if let Some(path) = path {
        info!(config_path = ?path, "Loading configuration from file");
        let content = fs::read_to_string(path).map_err(|e| {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            e
        })
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let raw: RawConfig = serde_yaml::from_str(&content).map_err(|e| {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            anyhow::anyhow!("Failed to parse config YAML: {e}")
        })?;

        if let Some(api) = raw.api {
            config.api = ApiConfig::new(api.base_url);
        }
        if let Some(dir) = raw.output_dir {
            config.output_dir = dir;
        }
        if let Some(length) = raw.length {
            config.length = length;
        }
    }

    config.api = config.api.with_env_override();

    config.api.trace_loaded();
    info!(
        output_dir = %config.output_dir.display(),
        length = %config.length,
        "Config loaded and merged successfully"
    );
    Ok(config)
}
