//! Terminal rendering of generation progress

use pdf_fixture::{
    format_megabytes, BatchObserver, GenerationResult, ProgressBar, ProgressEvent, ProgressSink,
    TargetSize,
};
use std::io::{self, Write};
use std::path::Path;

/// Draws a progress bar per document on stderr.
///
/// Bars are redrawn in place with `\r`, which only makes sense when one
/// document is generated at a time; with `draw_bars` off only the
/// per-document start and finish lines are printed.
pub struct ConsoleObserver {
    bar: ProgressBar,
    quiet: bool,
    draw_bars: bool,
}

impl ConsoleObserver {
    pub fn new(quiet: bool, draw_bars: bool) -> Self {
        Self {
            bar: ProgressBar::default(),
            quiet,
            draw_bars,
        }
    }

    fn print(&self, line: std::fmt::Arguments<'_>) {
        let mut stderr = io::stderr().lock();
        // Progress output is best effort; a closed stderr must not fail the run
        let _ = stderr.write_fmt(line);
        let _ = stderr.flush();
    }
}

impl BatchObserver for ConsoleObserver {
    fn on_document_queued(&self, index: usize, destination: &Path) {
        if self.quiet {
            return;
        }
        self.print(format_args!(
            "Generating PDF #{} at: {}\n",
            index,
            destination.display()
        ));
    }

    fn on_document_event(&self, _index: usize, event: &ProgressEvent) {
        if self.quiet {
            return;
        }
        if let ProgressEvent::Started { title, target } = event {
            self.print(format_args!("{}\n", started_line(title, *target)));
        }
        if !self.draw_bars {
            return;
        }
        self.print(format_args!(
            "\r{}",
            self.bar.render(ProgressBar::percent_for(event))
        ));
        if let ProgressEvent::Finished { .. } = event {
            self.print(format_args!("\n"));
        }
    }

    fn on_document_completed(&self, _index: usize, result: &GenerationResult) {
        if self.quiet {
            return;
        }
        self.print(format_args!(
            "✓ Done: '{}' ({}, {} pages)\n",
            result.filename,
            format_megabytes(result.size_bytes),
            result.pages
        ));
    }
}

fn started_line(title: &str, target: TargetSize) -> String {
    format!(
        "Generating '{}' targeting ~{}...",
        title,
        format_megabytes(target.bytes())
    )
}

/// Single-document adapter
impl ProgressSink for ConsoleObserver {
    fn on_event(&self, event: &ProgressEvent) {
        self.on_document_event(1, event);
    }
}
