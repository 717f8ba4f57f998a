//! Configuration for the build and serve commands
//!
//! Every field has a default, so an empty or missing TOML file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::articles::DEFAULT_TEXT_COLUMNS;
use crate::error::{Error, Result};
use crate::vectorizer::VectorizerConfig;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for an input CSV when none is given
    pub data_dir: PathBuf,
    /// Directory holding the three artifacts
    pub artifacts_dir: PathBuf,
    pub vectorizer: VectorizerConfig,
    pub corpus: CorpusConfig,
    pub server: ServerConfig,
}

/// Input table settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Columns concatenated into `full_text`, matched case-insensitively
    pub text_columns: Vec<String>,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            artifacts_dir: PathBuf::from("artifacts"),
            vectorizer: VectorizerConfig::default(),
            corpus: CorpusConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            text_columns: DEFAULT_TEXT_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// Read and validate a TOML file
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vectorizer.max_features == 0 {
            return Err(Error::InvalidConfig("vectorizer.max_features must be at least 1".into()));
        }
        if self.corpus.text_columns.iter().all(|c| c.trim().is_empty()) {
            return Err(Error::InvalidConfig("corpus.text_columns must name at least one column".into()));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
