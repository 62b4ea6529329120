//! Batch generation of fixture documents
//!
//! Runs the size-targeting generator `count` times, naming the files
//! `attachment-{i}.pdf` (or `attachment-{i}-{label}.pdf` with size labels),
//! and returns a [`BatchSummary`]. The first failure aborts the batch; files
//! written before it are left in place.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdf_fixture::{generate_batch, BatchOptions, NoProgress, TargetSize};
//!
//! # fn main() -> pdf_fixture::Result<()> {
//! let options = BatchOptions::default().with_label_sizes(true);
//! let summary = generate_batch(3, TargetSize::from_megabytes(1.0), "fixtures", &options, &NoProgress)?;
//!
//! println!("{}", summary.format_report());
//! # Ok(())
//! # }
//! ```

use crate::encoder::PageLayout;
use crate::error::{FixtureError, Result};
use crate::generator::{ensure_directory, GenerationRequest, GenerationResult, SizeTargetingGenerator};
use crate::progress::{BatchObserver, IndexedSink};
use crate::size::TargetSize;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

mod summary;

pub use summary::BatchSummary;

/// Options for batch generation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Append the target size to filenames (`attachment-1-1_00MB.pdf`)
    pub label_sizes: bool,
    /// Document titles are `"{title_prefix} {i}"`
    pub title_prefix: String,
    /// Filenames start with `"{file_prefix}-{i}"`
    pub file_prefix: String,
    /// Number of documents generated concurrently
    pub parallelism: usize,
    /// Page layout used for every document
    pub layout: PageLayout,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            label_sizes: false,
            title_prefix: "Attachment".to_string(),
            file_prefix: "attachment".to_string(),
            parallelism: 1,
            layout: PageLayout::default(),
        }
    }
}

impl BatchOptions {
    pub fn with_label_sizes(mut self, label_sizes: bool) -> Self {
        self.label_sizes = label_sizes;
        self
    }

    /// Set the number of parallel workers
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Filename of document `index` (1-based)
    pub fn filename(&self, index: usize, target: TargetSize) -> String {
        if self.label_sizes {
            format!("{}-{}-{}.pdf", self.file_prefix, index, target.label())
        } else {
            format!("{}-{}.pdf", self.file_prefix, index)
        }
    }

    /// Title rendered on every page of document `index`
    pub fn title(&self, index: usize) -> String {
        format!("{} {}", self.title_prefix, index)
    }
}

/// Generates `count` documents of at least `target` bytes in `output_dir`.
///
/// # Errors
///
/// Fails if `output_dir` cannot be created, or with the first generator
/// error, annotated with the index of the failing document.
pub fn generate_batch(
    count: usize,
    target: TargetSize,
    output_dir: impl AsRef<Path>,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> Result<BatchSummary> {
    let output_dir = output_dir.as_ref();
    ensure_directory(output_dir)?;

    info!(
        "Generating {} documents of {} in {}",
        count,
        target,
        output_dir.display()
    );

    let started_at = Utc::now();
    let start = Instant::now();

    let outcome = if options.parallelism > 1 && count > 1 {
        run_parallel(count, target, output_dir, options, observer)
    } else {
        run_sequential(count, target, output_dir, options, observer)
    };
    let results = outcome.inspect_err(|e| warn!("Batch aborted: {}", e))?;

    let summary = BatchSummary {
        results,
        elapsed: start.elapsed(),
        output_dir: output_dir.to_path_buf(),
        target,
        started_at,
    };

    info!(
        "Batch complete: {} documents, {} pages, {} bytes in {:.2}s (max overshoot {} bytes)",
        summary.count(),
        summary.total_pages(),
        summary.total_size_bytes(),
        summary.elapsed.as_secs_f64(),
        summary.max_overshoot_bytes()
    );

    Ok(summary)
}

fn run_sequential(
    count: usize,
    target: TargetSize,
    output_dir: &Path,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> Result<Vec<GenerationResult>> {
    let generator = SizeTargetingGenerator::new().with_layout(options.layout.clone());
    let mut results = Vec::with_capacity(count);

    for index in 1..=count {
        results.push(run_one(&generator, index, target, output_dir, options, observer)?);
    }

    Ok(results)
}

/// Whole documents are handed out to scoped workers; each document's own
/// loop stays single-threaded. Results are reassembled in index order.
fn run_parallel(
    count: usize,
    target: TargetSize,
    output_dir: &Path,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> Result<Vec<GenerationResult>> {
    let aborted = Arc::new(AtomicBool::new(false));
    let generator = SizeTargetingGenerator::new()
        .with_layout(options.layout.clone())
        .with_cancellation(Arc::clone(&aborted));
    let next_index = AtomicUsize::new(1);
    let workers = options.parallelism.min(count);
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let generator = &generator;
            let next_index = &next_index;
            let aborted = &aborted;

            scope.spawn(move || loop {
                let index = next_index.fetch_add(1, Ordering::SeqCst);
                if index > count || aborted.load(Ordering::SeqCst) {
                    break;
                }

                let outcome = run_one(generator, index, target, output_dir, options, observer);
                if outcome.is_err() {
                    aborted.store(true, Ordering::SeqCst);
                }
                if sender.send((index, outcome)).is_err() {
                    break;
                }
            });
        }
    });
    drop(sender);

    let mut slots: Vec<Option<GenerationResult>> = vec![None; count];
    let mut failure: Option<FixtureError> = None;

    for (index, outcome) in receiver {
        match outcome {
            Ok(result) => slots[index - 1] = Some(result),
            Err(error) => failure = Some(pick_failure(failure, error)),
        }
    }

    if let Some(error) = failure {
        return Err(error);
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Prefers real failures over the cancellations they caused, then the
/// lowest document index.
fn pick_failure(current: Option<FixtureError>, candidate: FixtureError) -> FixtureError {
    let Some(current) = current else {
        return candidate;
    };

    let rank = |e: &FixtureError| {
        let cancelled = matches!(e, FixtureError::Cancelled { .. });
        (cancelled, e.index().unwrap_or(usize::MAX))
    };

    if rank(&candidate) < rank(&current) {
        candidate
    } else {
        current
    }
}

fn run_one(
    generator: &SizeTargetingGenerator,
    index: usize,
    target: TargetSize,
    output_dir: &Path,
    options: &BatchOptions,
    observer: &dyn BatchObserver,
) -> Result<GenerationResult> {
    let destination = output_dir.join(options.filename(index, target));
    observer.on_document_queued(index, &destination);

    let request = GenerationRequest::new(options.title(index), target, destination);
    let sink = IndexedSink { index, observer };
    let result = generator
        .generate(&request, &sink)
        .map_err(|e| e.with_index(index))?;

    observer.on_document_completed(index, &result);
    Ok(result)
}
