use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring, generating or persisting fixtures.
///
/// Every variant that can occur inside a batch carries an optional document
/// index so callers can report which attachment failed.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("No configuration file found (searched: {})", display_paths(.searched))]
    ConfigurationMissing { searched: Vec<PathBuf> },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    ConfigurationInvalid { path: PathBuf, message: String },

    #[error("Failed to create directory {}{}: {source}", .path.display(), document_suffix(.index))]
    DirectoryCreationFailed {
        path: PathBuf,
        index: Option<usize>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize '{title}'{}: {message}", document_suffix(.index))]
    SerializationFailed {
        title: String,
        index: Option<usize>,
        message: String,
    },

    #[error("Failed to write {}{}: {source}", .path.display(), document_suffix(.index))]
    FileWriteFailed {
        path: PathBuf,
        index: Option<usize>,
        #[source]
        source: io::Error,
    },

    #[error("Generation cancelled{}", document_suffix(.index))]
    Cancelled { index: Option<usize> },
}

/// Fieldless discriminant of [`FixtureError`], handy for matching in callers
/// and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigurationMissing,
    ConfigurationInvalid,
    DirectoryCreationFailed,
    SerializationFailed,
    FileWriteFailed,
    Cancelled,
}

impl FixtureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixtureError::ConfigurationMissing { .. } => ErrorKind::ConfigurationMissing,
            FixtureError::ConfigurationInvalid { .. } => ErrorKind::ConfigurationInvalid,
            FixtureError::DirectoryCreationFailed { .. } => ErrorKind::DirectoryCreationFailed,
            FixtureError::SerializationFailed { .. } => ErrorKind::SerializationFailed,
            FixtureError::FileWriteFailed { .. } => ErrorKind::FileWriteFailed,
            FixtureError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Index of the batch document this error belongs to, if known.
    pub fn index(&self) -> Option<usize> {
        match self {
            FixtureError::DirectoryCreationFailed { index, .. }
            | FixtureError::SerializationFailed { index, .. }
            | FixtureError::FileWriteFailed { index, .. }
            | FixtureError::Cancelled { index } => *index,
            FixtureError::ConfigurationMissing { .. }
            | FixtureError::ConfigurationInvalid { .. } => None,
        }
    }

    /// Attaches a batch document index. Configuration errors are returned
    /// unchanged since they are never tied to a single document.
    pub fn with_index(mut self, document: usize) -> Self {
        match &mut self {
            FixtureError::DirectoryCreationFailed { index, .. }
            | FixtureError::SerializationFailed { index, .. }
            | FixtureError::FileWriteFailed { index, .. }
            | FixtureError::Cancelled { index } => *index = Some(document),
            FixtureError::ConfigurationMissing { .. }
            | FixtureError::ConfigurationInvalid { .. } => {}
        }
        self
    }
}

fn document_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (document #{i})"),
        None => String::new(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, FixtureError>;
