use std::ops::Range;

use crate::{
    core::{hour::HourLabel, series::Aggregate, settings::CustomPeakRange},
    quantity::price::MegawattHourPrice,
};

/// Early night: labels `1..=8`.
const AM_NIGHT: Range<usize> = 0..8;

/// Day: labels `9..=20`.
const DAY: Range<usize> = 8..20;

/// Late night: labels `21..=24`.
const PM_NIGHT: Range<usize> = 20..24;

/// Summary of a day's present prices. Any statistic over no prices is [`None`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DailyStatistics {
    pub mean: Option<MegawattHourPrice>,
    pub median: Option<MegawattHourPrice>,
    pub min: Option<MegawattHourPrice>,
    pub max: Option<MegawattHourPrice>,
    pub am_night_average: Option<MegawattHourPrice>,
    pub day_average: Option<MegawattHourPrice>,
    pub pm_night_average: Option<MegawattHourPrice>,
    pub custom_peak_average: Option<MegawattHourPrice>,
}

impl DailyStatistics {
    #[must_use]
    pub fn summarize(
        prices: &[Option<MegawattHourPrice>; HourLabel::N_HOURS],
        custom_peak: CustomPeakRange,
    ) -> Self {
        let present = || prices.iter().flatten().copied();
        Self {
            mean: average(prices),
            median: present().median().map(|median: MegawattHourPrice| median.round(2)),
            min: present().min(),
            max: present().max(),
            am_night_average: average(&prices[AM_NIGHT]),
            day_average: average(&prices[DAY]),
            pm_night_average: average(&prices[PM_NIGHT]),
            custom_peak_average: average(&prices[custom_peak.indices()]),
        }
    }
}

/// Mean of the present prices, rounded to 2 decimals.
fn average(prices: &[Option<MegawattHourPrice>]) -> Option<MegawattHourPrice> {
    prices.iter().flatten().copied().mean().map(|mean: MegawattHourPrice| mean.round(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(f: impl Fn(usize) -> Option<f64>) -> [Option<MegawattHourPrice>; 24] {
        std::array::from_fn(|index| f(index).map(MegawattHourPrice))
    }

    #[test]
    fn test_summarize_full_day() {
        #[expect(clippy::cast_precision_loss)]
        let prices = prices(|index| Some((index + 1) as f64));
        let statistics = DailyStatistics::summarize(&prices, CustomPeakRange::default());
        assert_eq!(statistics.mean, Some(MegawattHourPrice(12.5)));
        assert_eq!(statistics.median, Some(MegawattHourPrice(12.5)));
        assert_eq!(statistics.min, Some(MegawattHourPrice(1.0)));
        assert_eq!(statistics.max, Some(MegawattHourPrice(24.0)));
        assert_eq!(statistics.am_night_average, Some(MegawattHourPrice(4.5)));
        assert_eq!(statistics.day_average, Some(MegawattHourPrice(14.5)));
        assert_eq!(statistics.pm_night_average, Some(MegawattHourPrice(22.5)));

        // Labels 10..=16.
        assert_eq!(statistics.custom_peak_average, Some(MegawattHourPrice(13.0)));
    }

    #[test]
    fn test_summarize_empty() {
        let statistics = DailyStatistics::summarize(&[None; 24], CustomPeakRange::default());
        assert_eq!(statistics, DailyStatistics::default());
    }

    #[test]
    fn test_window_without_prices_is_absent() {
        let prices = prices(|index| (index >= 8).then_some(100.0));
        let statistics = DailyStatistics::summarize(&prices, CustomPeakRange::default());
        assert_eq!(statistics.am_night_average, None);
        assert_eq!(statistics.day_average, Some(MegawattHourPrice(100.0)));
    }

    #[test]
    fn test_degenerate_custom_peak() {
        let prices = prices(|index| Some(if index == 17 { 50.0 } else { 10.0 }));
        let statistics =
            DailyStatistics::summarize(&prices, CustomPeakRange { start: 18, end: 18 });
        assert_eq!(statistics.custom_peak_average, Some(MegawattHourPrice(50.0)));
    }

    #[test]
    fn test_rounding() {
        let prices = prices(|index| match index {
            0 => Some(1.0),
            1 => Some(1.0),
            2 => Some(2.0),
            _ => None,
        });
        let statistics = DailyStatistics::summarize(&prices, CustomPeakRange::default());
        assert_eq!(statistics.mean, Some(MegawattHourPrice(1.33)));
        assert_eq!(statistics.am_night_average, Some(MegawattHourPrice(1.33)));
        assert_eq!(statistics.median, Some(MegawattHourPrice(1.0)));
        assert_eq!(statistics.custom_peak_average, None);
    }
}
