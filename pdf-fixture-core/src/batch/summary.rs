//! Aggregated results of a batch run

use crate::generator::GenerationResult;
use crate::size::{bytes_to_megabytes, format_megabytes, TargetSize};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a batch operation.
///
/// Totals are derived from `results` on demand; the summary holds no other
/// state.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Per-document results, in generation order
    pub results: Vec<GenerationResult>,
    /// Wall-clock duration of the batch
    #[serde(serialize_with = "serialize_duration_secs")]
    pub elapsed: Duration,
    /// Directory the documents were written to
    pub output_dir: PathBuf,
    /// Target size of every document in the batch
    pub target: TargetSize,
    /// When the batch started
    pub started_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sum of all document sizes
    pub fn total_size_bytes(&self) -> u64 {
        self.results.iter().map(|r| r.size_bytes).sum()
    }

    pub fn total_pages(&self) -> u64 {
        self.results.iter().map(|r| u64::from(r.pages)).sum()
    }

    /// Largest overshoot of any document beyond the target
    pub fn max_overshoot_bytes(&self) -> u64 {
        self.results
            .iter()
            .map(|r| r.overshoot(self.target))
            .max()
            .unwrap_or(0)
    }

    /// Format elapsed time as `mm:ss`
    pub fn format_elapsed(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Format summary as a report
    pub fn format_report(&self) -> String {
        let mut report = format!("Generated {} PDFs:\n", self.results.len());

        for result in &self.results {
            report.push_str(&format!(
                " - {} ({})\n",
                result.filename,
                format_megabytes(result.size_bytes)
            ));
        }

        report.push_str(&format!(
            "Total size: {:.2}MB\n\
             Duration: {} sec\n\
             Output directory: {}\n",
            bytes_to_megabytes(self.total_size_bytes()),
            self.format_elapsed(),
            self.output_dir.display()
        ));

        report
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_report())
    }
}

fn serialize_duration_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(n: usize, size_bytes: u64) -> GenerationResult {
        GenerationResult {
            filename: format!("attachment-{n}.pdf"),
            size_bytes,
            pages: 3,
            path: PathBuf::from(format!("out/attachment-{n}.pdf")),
        }
    }

    fn summary(results: Vec<GenerationResult>) -> BatchSummary {
        BatchSummary {
            results,
            elapsed: Duration::from_secs(75),
            output_dir: PathBuf::from("out"),
            target: TargetSize::from_bytes(1_048_576),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_are_derived() {
        let summary = summary(vec![
            result(1, 1_100_000),
            result(2, 1_200_000),
            result(3, 1_048_576),
        ]);

        assert_eq!(summary.count(), 3);
        assert_eq!(summary.total_size_bytes(), 3_348_576);
        assert_eq!(summary.total_pages(), 9);
        assert_eq!(summary.max_overshoot_bytes(), 151_424);
    }

    #[test]
    fn test_empty_summary() {
        let mut summary = summary(Vec::new());
        summary.elapsed = Duration::ZERO;
        assert!(summary.is_empty());
        assert_eq!(summary.total_size_bytes(), 0);
        assert_eq!(summary.total_pages(), 0);
        assert_eq!(summary.max_overshoot_bytes(), 0);
        assert_eq!(summary.format_elapsed(), "00:00");
    }

    #[test]
    fn test_format_report() {
        let summary = summary(vec![result(1, 1_572_864), result(2, 2_097_152)]);

        assert_eq!(
            summary.format_report(),
            "Generated 2 PDFs:\n \
             - attachment-1.pdf (1.50MB)\n \
             - attachment-2.pdf (2.00MB)\n\
             Total size: 3.50MB\n\
             Duration: 01:15 sec\n\
             Output directory: out\n"
        );
    }

    #[test]
    fn test_result_serializes_field_names() {
        let summary = summary(vec![result(1, 42)]);
        let rendered = toml::to_string(&summary.results[0]).unwrap();
        assert!(rendered.contains("filename = \"attachment-1.pdf\""));
        assert!(rendered.contains("size_bytes = 42"));
    }
}
