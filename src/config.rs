// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use tracing::info;

/// Path checked for a config file when none is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "acsplot.yaml";

/// Runtime configuration. Every field has a default matching the current
/// data repository layout, so a bare invocation works; a YAML file and a
/// couple of environment variables override selectively. The access token is
/// never configured in the file, only in the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `owner/name` of the GitHub repository holding dataset exports.
    pub data_repo: String,
    /// Directory inside the repository with the current export batch.
    pub data_prefix: String,
    /// Dataset names, one JSON file each.
    pub datasets: Vec<String>,
    /// How long fetched datasets are served from the in-process cache.
    pub cache_ttl_secs: u64,
    /// Where plot spec artifacts are written.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_repo: "shi-institute/interactive-web-private-data".to_string(),
            data_prefix: "northside-24".to_string(),
            datasets: vec![
                "neighborhoods_data_series".to_string(),
                "tracts_data_series".to_string(),
            ],
            cache_ttl_secs: 60,
            out_dir: PathBuf::from("plots"),
        }
    }
}

impl Config {
    /// Load from `path`, or from `acsplot.yaml` if present, else defaults.
    /// `ACSPLOT_OUT_DIR` and `ACSPLOT_CACHE_TTL_SECS` override the file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                info!("no config file; using defaults");
                Config::default()
            }
        };

        if let Ok(out_dir) = env::var("ACSPLOT_OUT_DIR") {
            config.out_dir = PathBuf::from(out_dir);
        }
        if let Ok(ttl) = env::var("ACSPLOT_CACHE_TTL_SECS") {
            config.cache_ttl_secs = ttl
                .parse()
                .context("ACSPLOT_CACHE_TTL_SECS is not a number")?;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config `{}`", path.display()))?;
        let config = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config `{}`", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// The data-repository access token, environment only.
    pub fn token() -> Result<String> {
        env::var("DATA_REPO_ACCESS_TOKEN")
            .context("DATA_REPO_ACCESS_TOKEN is not set; the data repository is private")
    }
}
