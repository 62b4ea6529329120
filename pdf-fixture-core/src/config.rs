//! Batch configuration loaded from TOML
//!
//! ```toml
//! [pdf]
//! count = 3
//! size_mb = 1.0
//! output_dir = "build/generated-pdfs"
//! label_sizes = true
//! ```

use crate::batch::BatchOptions;
use crate::error::{FixtureError, Result};
use crate::size::TargetSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up by [`FixtureConfig::discover`]
pub const DEFAULT_CONFIG_FILE: &str = "pdf-fixture.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureConfig {
    pub pdf: PdfSettings,
}

/// Settings of the `[pdf]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSettings {
    /// Number of documents; zero or negative yields an empty batch
    pub count: i64,
    /// Target size per document in megabytes
    pub size_mb: f64,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub label_sizes: bool,
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_parallelism() -> usize {
    1
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            count: 3,
            size_mb: 1.0,
            output_dir: PathBuf::from("build/generated-pdfs"),
            label_sizes: false,
            parallelism: default_parallelism(),
        }
    }
}

impl PdfSettings {
    pub fn document_count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }

    pub fn target(&self) -> TargetSize {
        TargetSize::from_megabytes(self.size_mb)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::default()
            .with_label_sizes(self.label_sizes)
            .with_parallelism(self.parallelism)
    }
}

impl FixtureConfig {
    /// Parses configuration text; `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| FixtureError::ConfigurationInvalid {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// `ConfigurationMissing` if the file does not exist,
    /// `ConfigurationInvalid` if it cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FixtureError::ConfigurationMissing {
                searched: vec![path.to_path_buf()],
            },
            _ => FixtureError::ConfigurationInvalid {
                path: path.to_path_buf(),
                message: format!("Failed to read config: {e}"),
            },
        })?;

        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content, path)
    }

    /// Loads `pdf-fixture.toml` from `dir`
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(dir.as_ref().join(DEFAULT_CONFIG_FILE))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FixtureError::ConfigurationInvalid {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            message: format!("Failed to serialize config: {e}"),
        })
    }
}
