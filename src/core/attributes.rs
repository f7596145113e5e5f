use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{
        hour::{Half, HourLabel},
        ranking::RankedHourSlot,
        service::ServiceState,
        settings::{CustomPeakRange, Settings},
        snapshot::{DailySnapshot, RankingStats},
    },
    quantity::price::MegawattHourPrice,
};

pub const CURRENCY: &str = "PLN";

/// Read-only projection of the service state for external display.
///
/// Note that `average` is the arithmetic mean, while `mean` carries the median:
/// the names are part of the published display contract.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attributes {
    pub next_price: Option<MegawattHourPrice>,
    pub average: Option<MegawattHourPrice>,
    pub min: Option<MegawattHourPrice>,
    pub max: Option<MegawattHourPrice>,
    pub mean: Option<MegawattHourPrice>,
    pub am_night_avg: Option<MegawattHourPrice>,
    pub day_avg: Option<MegawattHourPrice>,
    pub pm_night_avg: Option<MegawattHourPrice>,
    pub custom_peak: Option<MegawattHourPrice>,

    #[serde_as(as = "DisplayFromStr")]
    pub custom_peak_range: CustomPeakRange,

    pub current_hour: HourLabel,
    pub current_hour_rank: Option<usize>,
    pub current_hour_percentile: Option<f64>,
    pub current_h_price: Option<bool>,
    pub current_l_price: Option<bool>,
    pub current_am_h_price: Option<bool>,
    pub current_am_l_price: Option<bool>,
    pub current_pm_h_price: Option<bool>,
    pub current_pm_l_price: Option<bool>,
    pub current_am_rank: Option<usize>,
    pub current_pm_rank: Option<usize>,

    pub currency: &'static str,
    pub last_updated: Option<DateTime<Tz>>,

    pub today_prices: Vec<PriceEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomorrow_prices: Option<Vec<PriceEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_stats: Option<RankingStats>,
}

impl Attributes {
    /// Project the state as seen at `now`, [`None`] until the first snapshot is there.
    pub fn project(state: &ServiceState, settings: &Settings, now: DateTime<Utc>) -> Option<Self> {
        let today = state.today.as_ref()?;
        let current_hour = HourLabel::of_wall_clock(now.with_timezone(&settings.time_zone).hour());
        let current = today.slot(current_hour);
        let next_slot = match current_hour.next() {
            Some(next_hour) => Some(today.slot(next_hour)),
            None => state.tomorrow.as_ref().map(|tomorrow| tomorrow.slot(HourLabel::FIRST)),
        };
        let current_half = |half: Half| (current_hour.half() == half).then_some(current);
        let half_rank =
            |half: Half| current_half(half).and_then(|slot| slot.half).map(|rank| rank.rank);
        Some(Self {
            next_price: next_slot.and_then(RankedHourSlot::price),
            average: today.statistics.mean,
            min: today.statistics.min,
            max: today.statistics.max,
            mean: today.statistics.median,
            am_night_avg: today.statistics.am_night_average,
            day_avg: today.statistics.day_average,
            pm_night_avg: today.statistics.pm_night_average,
            custom_peak: today.statistics.custom_peak_average,
            custom_peak_range: settings.custom_peak,
            current_hour,
            current_hour_rank: current.day.map(|rank| rank.rank),
            current_hour_percentile: current.percentile,
            current_h_price: Some(current.is_day_expensive()),
            current_l_price: Some(current.is_day_cheap()),
            current_am_h_price: current_half(Half::Am).map(RankedHourSlot::is_half_expensive),
            current_am_l_price: current_half(Half::Am).map(RankedHourSlot::is_half_cheap),
            current_pm_h_price: current_half(Half::Pm).map(RankedHourSlot::is_half_expensive),
            current_pm_l_price: current_half(Half::Pm).map(RankedHourSlot::is_half_cheap),
            current_am_rank: half_rank(Half::Am),
            current_pm_rank: half_rank(Half::Pm),
            currency: CURRENCY,
            last_updated: state
                .last_fetched_at
                .map(|fetched_at| fetched_at.with_timezone(&settings.time_zone)),
            today_prices: PriceEntry::list(today),
            tomorrow_prices: state.tomorrow.as_ref().map(PriceEntry::list),
            ranking_stats: today.ranking_stats(),
        })
    }
}

/// Single slot of the `today_prices` and `tomorrow_prices` lists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceEntry {
    pub hour: HourLabel,
    pub start: String,
    pub price: Option<MegawattHourPrice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_rank: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_position: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_percentile: Option<f64>,

    pub h_price: bool,
    pub l_price: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub am_h_price: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub am_l_price: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_h_price: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_l_price: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub am_rank: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_rank: Option<usize>,
}

impl PriceEntry {
    fn list(snapshot: &DailySnapshot) -> Vec<Self> {
        snapshot.slots.iter().map(Self::from).collect()
    }
}

impl From<&RankedHourSlot> for PriceEntry {
    fn from(slot: &RankedHourSlot) -> Self {
        let hour = slot.hour();
        let (is_am, is_pm) = match hour.half() {
            Half::Am => (true, false),
            Half::Pm => (false, true),
        };
        let half_rank = slot.half.map(|rank| rank.rank);
        Self {
            hour,
            start: hour.window_start(),
            price: slot.price(),
            price_rank: slot.day.map(|rank| rank.rank),
            price_position: slot.day.map(|rank| rank.position),
            price_percentile: slot.percentile,
            h_price: slot.is_day_expensive(),
            l_price: slot.is_day_cheap(),
            am_h_price: is_am.then(|| slot.is_half_expensive()),
            am_l_price: is_am.then(|| slot.is_half_cheap()),
            pm_h_price: is_pm.then(|| slot.is_half_expensive()),
            pm_l_price: is_pm.then(|| slot.is_half_cheap()),
            am_rank: half_rank.filter(|_| is_am),
            pm_rank: half_rank.filter(|_| is_pm),
        }
    }
}
