//! Display modes and their bucket configuration.
//!
//! Each mode selects one of the four raw count sequences in a
//! [`RawBundle`](super::RawBundle) and fixes how its buckets are labeled.

/// The display granularity for a counter.
///
/// Selects which raw sequence and bucket width to render. The default is
/// `Month`, matching the initial view of each card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One bucket per second over the last minute.
    Realtime,
    /// One bucket per hour over the last day.
    Day,
    /// One bucket per day over the last month.
    #[default]
    Month,
    /// One bucket per 30 days over the last year.
    Year,
}

/// Bucket width and label format for one mode.
///
/// This is a fixed table, not user-configurable: the server produces the
/// sequences at exactly these granularities.
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    /// Width of one bucket in seconds.
    pub step_secs: i64,
    /// chrono format string used to label a bucket's instant.
    pub label_format: &'static str,
}

impl Mode {
    /// All modes in selector order.
    pub const ALL: [Mode; 4] = [Mode::Realtime, Mode::Day, Mode::Month, Mode::Year];

    /// The bucket configuration for this mode.
    pub fn config(self) -> ModeConfig {
        match self {
            // second-of-minute, zero padded
            Mode::Realtime => ModeConfig { step_secs: 1, label_format: "%S" },
            // hour-of-day, no padding
            Mode::Day => ModeConfig { step_secs: 60 * 60, label_format: "%-H" },
            // day-of-month, no padding
            Mode::Month => ModeConfig { step_secs: 60 * 60 * 24, label_format: "%-d" },
            // month abbreviation
            Mode::Year => ModeConfig { step_secs: 60 * 60 * 24 * 30, label_format: "%b" },
        }
    }

    /// Returns the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Realtime => "Realtime",
            Mode::Day => "Day",
            Mode::Month => "Month",
            Mode::Year => "Year",
        }
    }

    /// Cycle to the next mode.
    pub fn next(self) -> Self {
        match self {
            Mode::Realtime => Mode::Day,
            Mode::Day => Mode::Month,
            Mode::Month => Mode::Year,
            Mode::Year => Mode::Realtime,
        }
    }

    /// Cycle to the previous mode.
    pub fn prev(self) -> Self {
        match self {
            Mode::Realtime => Mode::Year,
            Mode::Day => Mode::Realtime,
            Mode::Month => Mode::Day,
            Mode::Year => Mode::Month,
        }
    }

    /// Index of this mode within [`Mode::ALL`], for tab selection.
    pub fn index(self) -> usize {
        match self {
            Mode::Realtime => 0,
            Mode::Day => 1,
            Mode::Month => 2,
            Mode::Year => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_month() {
        assert_eq!(Mode::default(), Mode::Month);
    }

    #[test]
    fn bucket_widths_match_server_granularities() {
        assert_eq!(Mode::Realtime.config().step_secs, 1);
        assert_eq!(Mode::Day.config().step_secs, 3600);
        assert_eq!(Mode::Month.config().step_secs, 86400);
        assert_eq!(Mode::Year.config().step_secs, 2_592_000);
    }

    #[test]
    fn mode_cycle_is_closed() {
        for mode in Mode::ALL {
            assert_eq!(mode.next().prev(), mode);
        }
    }
}
