//! The time-series bucketing transform.
//!
//! Converts a [`RawBundle`]'s most-recent-first count sequences into
//! labeled, chronologically ascending chart series. This is a pure,
//! deterministic mapping: re-deriving from the same bundle yields identical
//! output and never mutates the input.

use chrono::Duration;

use super::{Mode, RawBundle};

/// A label/value series ready for rendering.
///
/// `labels` and `hits` are index-aligned and equal in length, ordered
/// oldest-to-newest so a left-to-right chart reads chronologically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    /// One formatted bucket label per entry.
    pub labels: Vec<String>,
    /// One hit count per bucket.
    pub hits: Vec<u64>,
}

impl ChartSeries {
    /// Derive the series for one mode from a raw bundle.
    ///
    /// Labels are computed by stepping back `i * step` seconds from the
    /// bundle's `now` for each index `i`, then reversing so the oldest
    /// bucket comes first. Hits are a reversed copy of the raw sequence.
    pub fn from_bundle(bundle: &RawBundle, mode: Mode) -> Self {
        let cfg = mode.config();
        let counts = bundle.counts(mode);

        let mut labels: Vec<String> = (0..counts.len())
            .map(|i| {
                let instant = bundle.now - Duration::seconds(i as i64 * cfg.step_secs);
                instant.format(cfg.label_format).to_string()
            })
            .collect();
        labels.reverse();

        let mut hits = counts.to_vec();
        hits.reverse();

        Self { labels, hits }
    }

    /// Sum of all hit counts in the series.
    pub fn total_hits(&self) -> u64 {
        self.hits.iter().sum()
    }

    /// Rounded mean of the hit counts; an empty series has mean 0.
    pub fn mean(&self) -> u64 {
        if self.hits.is_empty() {
            return 0;
        }
        (self.total_hits() as f64 / self.hits.len() as f64).round() as u64
    }
}

/// The chart series for all four modes, derived eagerly from one bundle.
///
/// Mode switching is a pure state update: every granularity is already
/// present here, so no re-fetch is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSeries {
    pub realtime: ChartSeries,
    pub day: ChartSeries,
    pub month: ChartSeries,
    pub year: ChartSeries,
}

impl ModeSeries {
    /// Derive all four series from a raw bundle.
    pub fn derive(bundle: &RawBundle) -> Self {
        Self {
            realtime: ChartSeries::from_bundle(bundle, Mode::Realtime),
            day: ChartSeries::from_bundle(bundle, Mode::Day),
            month: ChartSeries::from_bundle(bundle, Mode::Month),
            year: ChartSeries::from_bundle(bundle, Mode::Year),
        }
    }

    /// The series for the given mode.
    pub fn get(&self, mode: Mode) -> &ChartSeries {
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
    use chrono::DateTime;

    use super::*;

    fn bundle(now: &str, month: Vec<u64>) -> RawBundle {
        RawBundle {
            now: DateTime::parse_from_rfc3339(now).unwrap(),
            total: vec![42],
            realtime: vec![1, 0, 2],
            day: vec![7, 0],
            month,
            year: vec![],
        }
    }

    #[test]
    fn hits_are_reversed_and_labels_aligned() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![0, 3, 5]);
        let series = ChartSeries::from_bundle(&b, Mode::Month);

        assert_eq!(series.hits, vec![5, 3, 0]);
        assert_eq!(series.labels.len(), series.hits.len());
    }

    #[test]
    fn month_labels_ascend_chronologically() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![0, 3, 5]);
        let series = ChartSeries::from_bundle(&b, Mode::Month);

        // Index 0 is the bucket two days before now, index 2 is today.
        assert_eq!(series.labels, vec!["13", "14", "15"]);
    }

    #[test]
    fn month_scenario_mean() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![0, 3, 5]);
        let series = ChartSeries::from_bundle(&b, Mode::Month);

        // round((0 + 3 + 5) / 3) = 3
        assert_eq!(series.mean(), 3);
        assert_eq!(series.total_hits(), 8);
    }

    #[test]
    fn day_labels_step_back_one_hour() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![]);
        let series = ChartSeries::from_bundle(&b, Mode::Day);

        // day counts are [7, 0]: hour 11 then hour 12.
        assert_eq!(series.labels, vec!["11", "12"]);
        assert_eq!(series.hits, vec![0, 7]);
    }

    #[test]
    fn realtime_labels_are_zero_padded_seconds() {
        let b = bundle("2024-06-15T12:00:05+00:00", vec![]);
        let series = ChartSeries::from_bundle(&b, Mode::Realtime);

        assert_eq!(series.labels, vec!["03", "04", "05"]);
    }

    #[test]
    fn year_labels_are_month_abbreviations() {
        let mut b = bundle("2024-06-15T12:00:00+00:00", vec![]);
        b.year = vec![9, 9, 9];
        let series = ChartSeries::from_bundle(&b, Mode::Year);

        // 30-day steps back from mid June land in mid May and mid April.
        assert_eq!(series.labels, vec!["Apr", "May", "Jun"]);
    }

    #[test]
    fn labels_respect_server_offset() {
        // 23:30 UTC+2; in UTC this would be hour 21.
        let b = bundle("2024-06-15T23:30:00+02:00", vec![]);
        let series = ChartSeries::from_bundle(&b, Mode::Day);

        assert_eq!(series.labels.last().unwrap(), "23");
    }

    #[test]
    fn transform_is_idempotent_and_non_mutating() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![0, 3, 5]);
        let before = b.clone();

        let first = ChartSeries::from_bundle(&b, Mode::Month);
        let second = ChartSeries::from_bundle(&b, Mode::Month);

        assert_eq!(first, second);
        assert_eq!(b, before);
        assert_eq!(b.month, vec![0, 3, 5]);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        let series = ChartSeries { labels: vec![], hits: vec![] };
        assert_eq!(series.mean(), 0);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        let series = ChartSeries {
            labels: vec![String::new(), String::new()],
            hits: vec![4, 6],
        };
        assert_eq!(series.mean(), 5);
    }

    #[test]
    fn derive_covers_all_modes() {
        let b = bundle("2024-06-15T12:00:00+00:00", vec![0, 3, 5]);
        let all = ModeSeries::derive(&b);

        for mode in Mode::ALL {
            let series = all.get(mode);
            assert_eq!(series.labels.len(), b.counts(mode).len());
            assert_eq!(series.hits.len(), b.counts(mode).len());
        }
    }
}
