//! # pdf-fixture
//!
//! Generates PDF documents whose serialized size meets or exceeds a target,
//! for use as test fixtures (upload pipelines, file-size limits, attachment
//! handling).
//!
//! ## Features
//!
//! - **Size targeting**: pages of filler are appended until the fully
//!   re-serialized document reaches the target; the result never undershoots
//! - **Batches**: generate `attachment-1.pdf` .. `attachment-N.pdf` with an
//!   aggregated [`BatchSummary`]
//! - **Progress events**: generation emits [`ProgressEvent`]s instead of
//!   writing to the console
//! - **Atomic writes**: a failed run never leaves a partial file behind
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_fixture::{generate, TargetSize};
//!
//! # fn main() -> pdf_fixture::Result<()> {
//! let result = generate("Attachment 1", TargetSize::from_megabytes(1.0), "out/attachment-1.pdf")?;
//! println!("{} is {} bytes", result.filename, result.size_bytes);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod progress;
pub mod size;

pub use batch::{generate_batch, BatchOptions, BatchSummary};
pub use config::{FixtureConfig, PdfSettings, DEFAULT_CONFIG_FILE};
pub use encoder::{DocumentEncoder, PageContent, PageLayout, PdfEncoder};
pub use error::{ErrorKind, FixtureError, Result};
pub use generator::{generate, GenerationRequest, GenerationResult, SizeTargetingGenerator};
pub use progress::{BatchObserver, NoProgress, PercentTracker, ProgressBar, ProgressEvent, ProgressSink};
pub use size::{format_megabytes, TargetSize, BYTES_PER_MB};

/// Current version of pdf-fixture
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
