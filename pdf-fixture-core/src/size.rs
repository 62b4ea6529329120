//! Target size arithmetic and formatting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per megabyte (binary).
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Lower bound on the serialized size of a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSize(u64);

impl TargetSize {
    /// Target expressed directly in bytes
    pub fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Converts megabytes to bytes, truncating any fractional byte.
    ///
    /// Negative and NaN inputs become a zero-byte target, which still yields
    /// a single-page document. Values too large for `u64` saturate.
    pub fn from_megabytes(megabytes: f64) -> Self {
        // `as` saturates on overflow and maps NaN to 0
        Self((megabytes * BYTES_PER_MB as f64) as u64)
    }

    pub fn bytes(&self) -> u64 {
        self.0
    }

    pub fn megabytes(&self) -> f64 {
        bytes_to_megabytes(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Label used in size-annotated filenames, e.g. `1_50MB`.
    pub fn label(&self) -> String {
        format!("{:.2}MB", self.megabytes()).replace('.', "_")
    }

    /// Whole percent of this target reached by `current` bytes, floored.
    ///
    /// A zero target is always fully met, so it reports 100.
    pub fn percent_of(&self, current: u64) -> u32 {
        if self.0 == 0 {
            return 100;
        }
        let percent = (current as u128 * 100) / self.0 as u128;
        percent.min(u32::MAX as u128) as u32
    }

    /// True once `current` bytes meet or exceed the target.
    pub fn is_met_by(&self, current: u64) -> bool {
        current >= self.0
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", format_megabytes(self.0), self.0)
    }
}

pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

/// Formats a byte count as megabytes with two decimals, e.g. `1.05MB`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}MB", bytes_to_megabytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_megabytes() {
        assert_eq!(TargetSize::from_megabytes(1.0).bytes(), 1_048_576);
        assert_eq!(TargetSize::from_megabytes(0.5).bytes(), 524_288);
        assert_eq!(TargetSize::from_megabytes(0.0).bytes(), 0);
    }

    #[test]
    fn test_fractional_megabytes_truncate() {
        // 0.000001 MB = 1.048576 bytes
        assert_eq!(TargetSize::from_megabytes(0.000001).bytes(), 1);
        assert_eq!(TargetSize::from_megabytes(1.0000001).bytes(), 1_048_576);
    }

    #[test]
    fn test_degenerate_megabytes_clamp_to_zero() {
        assert!(TargetSize::from_megabytes(-3.5).is_zero());
        assert!(TargetSize::from_megabytes(f64::NAN).is_zero());
        assert_eq!(TargetSize::from_megabytes(f64::INFINITY).bytes(), u64::MAX);
    }

    #[test]
    fn test_label() {
        assert_eq!(TargetSize::from_megabytes(1.0).label(), "1_00MB");
        assert_eq!(TargetSize::from_megabytes(2.5).label(), "2_50MB");
        assert_eq!(TargetSize::from_megabytes(0.0).label(), "0_00MB");
    }

    #[test]
    fn test_percent_of() {
        let target = TargetSize::from_bytes(1000);
        assert_eq!(target.percent_of(0), 0);
        assert_eq!(target.percent_of(9), 0);
        assert_eq!(target.percent_of(10), 1);
        assert_eq!(target.percent_of(999), 99);
        assert_eq!(target.percent_of(1000), 100);
        assert_eq!(target.percent_of(1500), 150);
    }

    #[test]
    fn test_zero_target_is_always_met() {
        let target = TargetSize::from_bytes(0);
        assert_eq!(target.percent_of(0), 100);
        assert_eq!(target.percent_of(12345), 100);
        assert!(target.is_met_by(0));
    }

    #[test]
    fn test_display() {
        let target = TargetSize::from_bytes(1_048_576);
        assert_eq!(target.to_string(), "1.00MB (1048576 bytes)");
        assert_eq!(format_megabytes(1_572_864), "1.50MB");
    }

    proptest! {
        #[test]
        fn prop_megabytes_truncate_toward_zero(mb in 0.0f64..4096.0) {
            let bytes = TargetSize::from_megabytes(mb).bytes();
            let exact = mb * BYTES_PER_MB as f64;
            prop_assert!(bytes as f64 <= exact);
            prop_assert!(exact - (bytes as f64) < 1.0);
        }

        #[test]
        fn prop_percent_is_monotonic(target in 1u64..10_000_000, a in 0u64..20_000_000, b in 0u64..20_000_000) {
            let target = TargetSize::from_bytes(target);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(target.percent_of(lo) <= target.percent_of(hi));
        }

        #[test]
        fn prop_met_implies_full_percent(target in 0u64..10_000_000, current in 0u64..20_000_000) {
            let target = TargetSize::from_bytes(target);
            if target.is_met_by(current) {
                prop_assert!(target.percent_of(current) >= 100);
            }
        }
    }
}
