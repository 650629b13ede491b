// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{IngestError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "DOC_INGEST";
pub const MAX_FLUSH_THRESHOLD: usize = 100_000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub files: FilesConfig,
    pub database: DatabaseConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesConfig {
    pub root_dir: PathBuf,
    #[serde(default)]
    pub follow_links: bool,
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    /// Zero disables the size check.
    #[serde(default)]
    pub max_file_size_mb: u64,
    #[serde(default = "default_true")]
    pub dump_metadata: bool,
    /// Logs owner, group and mode of each file before extraction.
    #[serde(default)]
    pub dump_permissions: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: String,
    #[serde(default = "default_query")]
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub endpoint: String,
    pub collection: String,
    #[serde(default = "default_commit_within_ms")]
    pub commit_within_ms: u64,
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_query() -> String {
    "select id,title,text from test".to_string()
}

fn default_commit_within_ms() -> u64 {
    300_000
}

fn default_flush_threshold() -> usize {
    1000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl IndexConfig {
    pub fn commit_within(&self) -> Duration {
        Duration::from_millis(self.commit_within_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| IngestError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| IngestError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            files: FilesConfig {
                root_dir: PathBuf::from("./docs"),
                follow_links: false,
                skip_patterns: vec![".git/".to_string(), "*.lock".to_string()],
                max_file_size_mb: 100,
                dump_metadata: true,
                dump_permissions: false,
            },
            database: DatabaseConfig {
                enabled: true,
                url: "mysql://localhost:3306/test".to_string(),
                query: default_query(),
            },
            index: IndexConfig {
                endpoint: "http://localhost:8983/solr".to_string(),
                collection: "documents".to_string(),
                commit_within_ms: default_commit_within_ms(),
                flush_threshold: default_flush_threshold(),
                connect_timeout_ms: default_connect_timeout_ms(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.flush_threshold == 0 {
            return Err(IngestError::Config(
                "flush_threshold must be greater than 0".to_string(),
            ));
        }

        if self.index.flush_threshold > MAX_FLUSH_THRESHOLD {
            return Err(IngestError::Config(format!(
                "flush_threshold must not exceed {}",
                MAX_FLUSH_THRESHOLD
            )));
        }

        if self.index.collection.trim().is_empty() {
            return Err(IngestError::Config(
                "index collection must not be empty".to_string(),
            ));
        }

        Validator::validate_url(&self.index.endpoint)
            .map_err(|e| IngestError::Config(e.to_string()))?;

        if self.database.enabled && self.database.query.trim().is_empty() {
            return Err(IngestError::Config(
                "database query must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
