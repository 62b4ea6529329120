//! Progress reporting for fixture generation
//!
//! The generator never writes to the console. It emits [`ProgressEvent`]s to
//! a [`ProgressSink`]; the batch orchestrator tags them with the document
//! index and forwards them to a [`BatchObserver`]. Rendering is left to the
//! consumer, e.g. [`ProgressBar`].

use crate::generator::GenerationResult;
use crate::size::TargetSize;
use std::path::Path;

/// Event emitted while a single document is being generated
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Generation is about to start
    Started { title: String, target: TargetSize },
    /// The serialized size crossed a new whole-percent boundary.
    ///
    /// `percent` is strictly increasing within one run and may exceed 100
    /// on the final page.
    Percent {
        percent: u32,
        current_bytes: u64,
        pages: u32,
    },
    /// The document was persisted. Consumers render this as 100%.
    Finished { size_bytes: u64, pages: u32 },
}

/// Receiver for per-document progress events
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: &ProgressEvent) {}
}

impl BatchObserver for NoProgress {
    fn on_document_event(&self, _index: usize, _event: &ProgressEvent) {}
}

/// Receiver for batch-level progress.
///
/// Only `on_document_event` is required; the lifecycle hooks default to
/// no-ops.
pub trait BatchObserver: Send + Sync {
    /// Called right before document `index` (1-based) is generated
    fn on_document_queued(&self, _index: usize, _destination: &Path) {}

    /// Progress of document `index`
    fn on_document_event(&self, index: usize, event: &ProgressEvent);

    /// Called after document `index` was written
    fn on_document_completed(&self, _index: usize, _result: &GenerationResult) {}
}

impl<F> BatchObserver for F
where
    F: Fn(usize, &ProgressEvent) + Send + Sync,
{
    fn on_document_event(&self, index: usize, event: &ProgressEvent) {
        self(index, event)
    }
}

/// Adapts a [`BatchObserver`] into the [`ProgressSink`] of one document
pub(crate) struct IndexedSink<'a> {
    pub(crate) index: usize,
    pub(crate) observer: &'a dyn BatchObserver,
}

impl ProgressSink for IndexedSink<'_> {
    fn on_event(&self, event: &ProgressEvent) {
        self.observer.on_document_event(self.index, event);
    }
}

/// Tracks the highest percent reported so far so each value is emitted once
#[derive(Debug, Clone, Default)]
pub struct PercentTracker {
    last_reported: Option<u32>,
}

impl PercentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Some(percent)` if it is above everything reported before.
    pub fn advance(&mut self, percent: u32) -> Option<u32> {
        match self.last_reported {
            Some(last) if percent <= last => None,
            _ => {
                self.last_reported = Some(percent);
                Some(percent)
            }
        }
    }

    pub fn last_reported(&self) -> Option<u32> {
        self.last_reported
    }
}

/// Text progress bar renderer, e.g. `[################------------------------]  40%`
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    width: usize,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ProgressBar {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Renders `percent`. The bar is capped at full width on overshoot while
    /// the printed number keeps the real value.
    pub fn render(&self, percent: u32) -> String {
        let capped = percent.min(100) as usize;
        let filled = capped * self.width / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(self.width - filled),
            percent
        )
    }

    /// Percent to draw for an event
    pub fn percent_for(event: &ProgressEvent) -> u32 {
        match event {
            ProgressEvent::Started { .. } => 0,
            ProgressEvent::Percent { percent, .. } => *percent,
            ProgressEvent::Finished { .. } => 100,
        }
    }
}
