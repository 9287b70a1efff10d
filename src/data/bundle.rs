//! Raw API payload types.
//!
//! These types match the JSON produced by an incr server's counter query
//! endpoint. They serve as the versionless contract between the server and
//! this dashboard: unknown extra fields are ignored, missing required fields
//! make the payload malformed.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Mode;

/// The unprocessed API response for one counter.
///
/// Contains the all-time total plus four parallel count-per-bucket
/// sequences, one per display granularity. Sequences are ordered
/// most-recent-first: index 0 is the bucket containing `now`.
///
/// A bundle is immutable once received; a re-fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBundle {
    /// When the server produced this bundle. Kept in the server's UTC
    /// offset so bucket labels render in the timezone the server rolled
    /// its buckets in.
    pub now: DateTime<FixedOffset>,
    /// The first element is the all-time total hit count.
    pub total: Vec<u64>,
    /// Per-second counts over the last minute.
    pub realtime: Vec<u64>,
    /// Per-hour counts over the last day.
    pub day: Vec<u64>,
    /// Per-day counts over the last month.
    pub month: Vec<u64>,
    /// Per-30-day counts over the last year.
    pub year: Vec<u64>,
}

impl RawBundle {
    /// The all-time total hit count, independent of any display mode.
    pub fn total(&self) -> u64 {
        self.total.first().copied().unwrap_or(0)
    }

    /// The raw count sequence for the given mode.
    pub fn counts(&self, mode: Mode) -> &[u64] {
        match mode {
            Mode::Realtime => &self.realtime,
            Mode::Day => &self.day,
            Mode::Month => &self.month,
            Mode::Year => &self.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_bundle() {
        let json = r#"{
            "now": "2024-06-01T12:30:45+02:00",
            "total": [42],
            "realtime": [1, 0, 2],
            "day": [5, 5],
            "month": [0, 3, 5],
            "year": [100]
        }"#;

        let bundle: RawBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.total(), 42);
        assert_eq!(bundle.counts(Mode::Month), &[0, 3, 5]);
        assert_eq!(bundle.counts(Mode::Realtime), &[1, 0, 2]);
        assert_eq!(bundle.now.to_rfc3339(), "2024-06-01T12:30:45+02:00");
    }

    #[test]
    fn missing_sequence_is_malformed() {
        // No "year" field: the payload must be rejected, not defaulted.
        let json = r#"{
            "now": "2024-06-01T12:30:45Z",
            "total": [1],
            "realtime": [],
            "day": [],
            "month": []
        }"#;

        assert!(serde_json::from_str::<RawBundle>(json).is_err());
    }

    #[test]
    fn negative_counts_are_malformed() {
        let json = r#"{
            "now": "2024-06-01T12:30:45Z",
            "total": [1],
            "realtime": [-3],
            "day": [],
            "month": [],
            "year": []
        }"#;

        assert!(serde_json::from_str::<RawBundle>(json).is_err());
    }

    #[test]
    fn empty_total_reads_as_zero() {
        let json = r#"{
            "now": "2024-06-01T12:30:45Z",
            "total": [],
            "realtime": [],
            "day": [],
            "month": [],
            "year": []
        }"#;

        let bundle: RawBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.total(), 0);
    }
}
