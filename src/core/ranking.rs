use itertools::Itertools;

use crate::{
    core::{
        curve::{DailyCurve, HourSlot},
        hour::{Half, HourLabel},
    },
    quantity::{self, price::MegawattHourPrice},
};

/// How many of the cheapest and of the most expensive hours get flagged within a window.
#[derive(Copy, Clone, Debug, Eq, PartialEq, bon::Builder)]
pub struct Thresholds {
    pub n_cheap: usize,
    pub n_expensive: usize,
}

impl Thresholds {
    /// Clamp both counts into `1..=max`.
    #[must_use]
    pub fn clamp(self, max: usize) -> Self {
        Self { n_cheap: self.n_cheap.clamp(1, max), n_expensive: self.n_expensive.clamp(1, max) }
    }
}

/// Thresholds of the three independent ranking windows.
#[derive(Copy, Clone, Debug, Eq, PartialEq, bon::Builder)]
pub struct RankingSettings {
    pub day: Thresholds,
    pub am: Thresholds,
    pub pm: Thresholds,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            day: Thresholds { n_cheap: 3, n_expensive: 5 },
            am: Thresholds { n_cheap: 2, n_expensive: 2 },
            pm: Thresholds { n_cheap: 2, n_expensive: 2 },
        }
    }
}

/// Rank of a priced slot within a window.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WindowRank {
    /// 1 is the cheapest, equal prices share the rank of their first occurrence.
    pub rank: usize,

    /// 1-based position in the sorted window, ties broken by the slot order.
    pub position: usize,

    pub is_cheap: bool,
    pub is_expensive: bool,
}

/// Rank the priced slots of the window with dense competition ranking.
///
/// Absent prices are skipped and stay [`None`].
/// The thresholds apply to the number of priced slots `n`: a slot is cheap when `rank ≤ n_cheap`,
/// and expensive when `rank > n - n_expensive`.
#[must_use]
pub fn rank_window(
    prices: &[Option<MegawattHourPrice>],
    thresholds: Thresholds,
) -> Vec<Option<WindowRank>> {
    let sorted = prices
        .iter()
        .enumerate()
        .filter_map(|(index, price)| price.map(|price| (index, price)))
        .sorted_by_key(|(_, price)| *price)
        .collect_vec();
    let n_priced = sorted.len();

    let mut ranks = vec![None; prices.len()];
    let mut previous: Option<(MegawattHourPrice, usize)> = None;
    for (position, (index, price)) in sorted.into_iter().enumerate() {
        let rank = match previous {
            Some((previous_price, previous_rank)) if previous_price == price => previous_rank,
            _ => position + 1,
        };
        previous = Some((price, rank));
        ranks[index] = Some(WindowRank {
            rank,
            position: position + 1,
            is_cheap: rank <= thresholds.n_cheap,
            is_expensive: rank + thresholds.n_expensive > n_priced,
        });
    }
    ranks
}

/// Hourly slot annotated with the whole-day and the half-day rankings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RankedHourSlot {
    pub slot: HourSlot,

    pub day: Option<WindowRank>,

    /// Percentile of the whole-day position, `0..=100`.
    pub percentile: Option<f64>,

    /// Rank within the slot's own half of the day.
    pub half: Option<WindowRank>,
}

impl RankedHourSlot {
    pub const fn hour(&self) -> HourLabel {
        self.slot.hour
    }

    pub const fn price(&self) -> Option<MegawattHourPrice> {
        self.slot.price
    }

    pub fn is_day_cheap(&self) -> bool {
        self.day.is_some_and(|rank| rank.is_cheap)
    }

    pub fn is_day_expensive(&self) -> bool {
        self.day.is_some_and(|rank| rank.is_expensive)
    }

    pub fn is_half_cheap(&self) -> bool {
        self.half.is_some_and(|rank| rank.is_cheap)
    }

    pub fn is_half_expensive(&self) -> bool {
        self.half.is_some_and(|rank| rank.is_expensive)
    }
}

/// Rank the whole day, then each half independently.
#[must_use]
pub fn rank_curve(
    curve: &DailyCurve,
    settings: &RankingSettings,
) -> [RankedHourSlot; HourLabel::N_HOURS] {
    let prices = curve.prices();
    let day_ranks = rank_window(&prices, settings.day.clamp(24));
    let n_priced = curve.n_priced();

    let mut half_ranks = vec![None; HourLabel::N_HOURS];
    for (half, thresholds) in [(Half::Am, settings.am), (Half::Pm, settings.pm)] {
        let indices = half.indices();
        let ranks = rank_window(&prices[indices.clone()], thresholds.clamp(12));
        half_ranks[indices].copy_from_slice(&ranks);
    }

    curve.0.map(|slot| {
        let day = day_ranks[slot.hour.index()];
        RankedHourSlot {
            slot,
            day,
            percentile: day.map(|rank| percentile(rank.position, n_priced)),
            half: half_ranks[slot.hour.index()],
        }
    })
}

/// Percentile of the 1-based position, always scaled to a full day of 24 positions.
#[expect(clippy::cast_precision_loss)]
fn percentile(position: usize, n_priced: usize) -> f64 {
    if n_priced > 1 { quantity::round((position - 1) as f64 / 23.0 * 100.0, 1) } else { 50.0 }
}
