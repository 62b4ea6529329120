//! Generation requests and results

use crate::size::{format_megabytes, TargetSize};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One document to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    title: String,
    target: TargetSize,
    destination: PathBuf,
}

impl GenerationRequest {
    pub fn new(title: impl Into<String>, target: TargetSize, destination: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            target,
            destination: destination.into(),
        }
    }

    /// Request with the target given in (possibly fractional) megabytes
    pub fn from_megabytes(
        title: impl Into<String>,
        megabytes: f64,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(title, TargetSize::from_megabytes(megabytes), destination)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target(&self) -> TargetSize {
        self.target
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Final path component of the destination
    pub fn filename(&self) -> Option<String> {
        self.destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Outcome of a completed generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub filename: String,
    pub size_bytes: u64,
    pub pages: u32,
    pub path: PathBuf,
}

impl GenerationResult {
    /// Bytes written beyond the target
    pub fn overshoot(&self, target: TargetSize) -> u64 {
        self.size_bytes.saturating_sub(target.bytes())
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} pages)",
            self.filename,
            format_megabytes(self.size_bytes),
            self.pages
        )
    }
}
