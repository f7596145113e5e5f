use crate::{
    core::{aggregate::HourBuckets, hour::HourLabel, series::Aggregate},
    quantity::price::MegawattHourPrice,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: HourLabel,

    /// Mean of the quarter-hour prices rounded to 2 decimals, [`None`] if no sample landed here.
    pub price: Option<MegawattHourPrice>,

    pub n_samples: usize,
}

/// Complete hourly price curve of a day: exactly one slot per label, ascending.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DailyCurve(pub [HourSlot; HourLabel::N_HOURS]);

impl DailyCurve {
    /// Average each bucket into its slot. Gaps stay gaps, nothing is interpolated.
    #[must_use]
    pub fn build(mut buckets: HourBuckets) -> Self {
        Self(HourLabel::ALL.map(|hour| {
            let prices = buckets.remove(&hour).unwrap_or_default();
            HourSlot {
                hour,
                n_samples: prices.len(),
                price: prices.into_iter().mean().map(|mean: MegawattHourPrice| mean.round(2)),
            }
        }))
    }

    pub fn prices(&self) -> [Option<MegawattHourPrice>; HourLabel::N_HOURS] {
        self.0.map(|slot| slot.price)
    }

    pub fn n_priced(&self) -> usize {
        self.0.iter().filter(|slot| slot.price.is_some()).count()
    }
}
