//! Size-targeting document generator
//!
//! Appends one page of filler at a time, re-serializes the *whole* document
//! and stops as soon as the serialized size meets or exceeds the target.
//! Container overhead (page tree, cross-reference table, shared resources)
//! does not grow linearly with content, so the size is always measured on
//! the real encoded bytes rather than estimated.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdf_fixture::{GenerationRequest, NoProgress, SizeTargetingGenerator};
//!
//! # fn main() -> pdf_fixture::Result<()> {
//! let request = GenerationRequest::from_megabytes("Attachment 1", 2.5, "out/attachment-1.pdf");
//! let result = SizeTargetingGenerator::new().generate(&request, &NoProgress)?;
//!
//! assert!(result.size_bytes >= request.target().bytes());
//! # Ok(())
//! # }
//! ```

use crate::encoder::{DocumentEncoder, PageLayout, PdfEncoder};
use crate::error::{FixtureError, Result};
use crate::progress::{NoProgress, PercentTracker, ProgressEvent, ProgressSink};
use crate::size::TargetSize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

mod request;

pub use request::{GenerationRequest, GenerationResult};

/// Generates documents that are at least as large as their target
#[derive(Debug, Clone, Default)]
pub struct SizeTargetingGenerator {
    layout: PageLayout,
    cancelled: Option<Arc<AtomicBool>>,
}

impl SizeTargetingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom page layout
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Abort between pages once `flag` is set
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Generates `request` with the `oxidize-pdf` encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded, the destination
    /// directory cannot be created, or the file cannot be written. No file is
    /// left at the destination on failure.
    pub fn generate(
        &self,
        request: &GenerationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<GenerationResult> {
        let encoder = PdfEncoder::new(request.title(), self.layout.clone());
        self.generate_with(encoder, request, sink)
    }

    /// Generates `request` with a caller-supplied encoder
    pub fn generate_with<E: DocumentEncoder>(
        &self,
        mut encoder: E,
        request: &GenerationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<GenerationResult> {
        let filename = request
            .filename()
            .ok_or_else(|| FixtureError::FileWriteFailed {
                path: request.destination().to_path_buf(),
                index: None,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination has no file name",
                ),
            })?;

        let rendered = self.render_to_target(&mut encoder, request, sink)?;
        persist(request.destination(), &rendered.buffer)?;

        let size_bytes = rendered.buffer.len() as u64;
        sink.on_event(&ProgressEvent::Finished {
            size_bytes,
            pages: rendered.pages,
        });

        info!(
            "Generated {} ({} bytes, {} pages, target {})",
            request.destination().display(),
            size_bytes,
            rendered.pages,
            request.target()
        );

        Ok(GenerationResult {
            filename,
            size_bytes,
            pages: rendered.pages,
            path: request.destination().to_path_buf(),
        })
    }

    /// Runs the append/measure loop until the target is met.
    ///
    /// The loop checks after appending, so even a zero target produces one
    /// page.
    fn render_to_target<E: DocumentEncoder>(
        &self,
        encoder: &mut E,
        request: &GenerationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<RenderedDocument> {
        let target = request.target();
        let mut tracker = PercentTracker::new();
        let mut page_number: u32 = 1;

        sink.on_event(&ProgressEvent::Started {
            title: request.title().to_string(),
            target,
        });

        loop {
            if self.is_cancelled() {
                return Err(FixtureError::Cancelled { index: None });
            }

            let content = self.layout.page(request.title(), page_number);
            encoder
                .append_page(&content)
                .map_err(|e| serialization_failed(request, e))?;

            let buffer = encoder
                .serialize()
                .map_err(|e| serialization_failed(request, e))?;
            let current_size = buffer.len() as u64;

            debug!(
                "{}: page {} -> {} bytes ({} pages encoded)",
                request.title(),
                page_number,
                current_size,
                encoder.page_count()
            );

            if let Some(percent) = tracker.advance(target.percent_of(current_size)) {
                sink.on_event(&ProgressEvent::Percent {
                    percent,
                    current_bytes: current_size,
                    pages: page_number,
                });
            }

            if target.is_met_by(current_size) {
                return Ok(RenderedDocument {
                    buffer,
                    pages: page_number,
                });
            }

            page_number += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

struct RenderedDocument {
    buffer: Vec<u8>,
    pages: u32,
}

fn serialization_failed(request: &GenerationRequest, error: impl std::fmt::Display) -> FixtureError {
    FixtureError::SerializationFailed {
        title: request.title().to_string(),
        index: None,
        message: error.to_string(),
    }
}

/// Generates a single document without progress reporting
pub fn generate(
    title: &str,
    target: TargetSize,
    destination: impl AsRef<Path>,
) -> Result<GenerationResult> {
    let request = GenerationRequest::new(title, target, destination.as_ref());
    SizeTargetingGenerator::new().generate(&request, &NoProgress)
}

/// Writes `buffer` to `destination` through a temporary file in the same
/// directory, so the destination only ever holds a complete document.
pub(crate) fn persist(destination: &Path, buffer: &[u8]) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    ensure_directory(&parent)?;

    let write_failed = |source: io::Error| FixtureError::FileWriteFailed {
        path: destination.to_path_buf(),
        index: None,
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".pdf-fixture-")
        .suffix(".partial")
        .tempfile_in(&parent)
        .map_err(write_failed)?;
    temp.write_all(buffer).map_err(write_failed)?;
    temp.flush().map_err(write_failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }

    temp.persist(destination)
        .map_err(|e| write_failed(e.error))?;
    Ok(())
}

/// Creates `dir` and its parents; succeeds if it already exists
pub(crate) fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| FixtureError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        index: None,
        source,
    })
}
