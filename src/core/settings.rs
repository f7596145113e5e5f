use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    ops::Range,
};

use chrono_tz::Tz;

use crate::{
    core::{hour::HourLabel, ranking::RankingSettings},
    prelude::*,
};

/// User-defined `[start, end)` range of hour labels averaged as the custom peak.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CustomPeakRange {
    pub start: u32,
    pub end: u32,
}

impl Default for CustomPeakRange {
    fn default() -> Self {
        Self { start: 10, end: 17 }
    }
}

impl Display for CustomPeakRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl CustomPeakRange {
    /// Parse `start-end`, accepting `1 ≤ start ≤ 24`, `1 ≤ end ≤ 25`, and `start < end`.
    ///
    /// Anything else is logged and replaced with the default range.
    pub fn parse_or_default(raw: &str) -> Result<Self, Infallible> {
        Ok(Self::parse(raw).unwrap_or_else(|| {
            let default = Self::default();
            warn!(raw, %default, "invalid custom peak range, using the default");
            default
        }))
    }

    fn parse(raw: &str) -> Option<Self> {
        let (start, end) = raw.trim().split_once('-')?;
        let range = Self { start: start.trim().parse().ok()?, end: end.trim().parse().ok()? };
        let is_valid = (1..=24).contains(&range.start)
            && (1..=25).contains(&range.end)
            && (range.start < range.end);
        is_valid.then_some(range)
    }

    /// Zero-based slot indices covered by the range.
    ///
    /// The start is clamped into the day and the end is forced past the start, so a degenerate
    /// range still covers a single slot. The end is exclusive in the same way the labels are
    /// read, so `10-17` covers labels `10..=16`.
    pub fn indices(self) -> Range<usize> {
        let last_index = HourLabel::N_HOURS - 1;
        let start = (self.start as usize).saturating_sub(1).min(last_index);
        let end = (self.end as usize).saturating_sub(1).max(start + 1).min(HourLabel::N_HOURS);
        start..end
    }
}

/// Everything the snapshot service needs to know besides the price source.
#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct Settings {
    #[builder(default)]
    pub ranking: RankingSettings,

    #[builder(default)]
    pub custom_peak: CustomPeakRange,

    /// Reference zone for the slot mapping and the refresh policy.
    #[builder(default = chrono_tz::Europe::Warsaw)]
    pub time_zone: Tz,

    /// Local hour when the next day's prices get published.
    #[builder(default = 15)]
    pub afternoon_hour: u32,
}
