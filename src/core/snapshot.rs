use chrono::NaiveDate;

use crate::{
    core::{
        aggregate::aggregate_quarters,
        curve::DailyCurve,
        hour::HourLabel,
        ranking::{RankedHourSlot, rank_curve},
        sample::RawSample,
        series::Aggregate,
        settings::Settings,
        source::FetchError,
        statistics::DailyStatistics,
    },
    prelude::*,
    quantity,
};

/// Fully computed day: replaced wholesale on refresh and never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub slots: [RankedHourSlot; HourLabel::N_HOURS],
    pub statistics: DailyStatistics,
}

impl DailySnapshot {
    /// Run the whole pipeline over the day's raw samples.
    ///
    /// Fails when not a single sample is usable, so that the caller can keep its previous snapshot.
    #[instrument(skip_all, fields(on = %on))]
    pub fn try_build(
        on: NaiveDate,
        samples: &[RawSample],
        settings: &Settings,
    ) -> Result<Self, FetchError> {
        let curve = DailyCurve::build(aggregate_quarters(samples, on, settings.time_zone));
        let n_priced = curve.n_priced();
        if n_priced == 0 {
            return Err(FetchError::MalformedPayload(format!(
                "none of the {} samples is usable",
                samples.len(),
            )));
        }
        if n_priced < HourLabel::N_HOURS {
            warn!(n_priced, "some hours have no price");
        }
        let statistics = DailyStatistics::summarize(&curve.prices(), settings.custom_peak);
        let slots = rank_curve(&curve, &settings.ranking);
        debug!(?statistics.mean, ?statistics.min, ?statistics.max, "built");
        Ok(Self { date: on, slots, statistics })
    }

    pub const fn slot(&self, hour: HourLabel) -> &RankedHourSlot {
        &self.slots[hour.index()]
    }

    /// Summary of the whole-day ranks, [`None`] when nothing is ranked.
    pub fn ranking_stats(&self) -> Option<RankingStats> {
        let ranks = || self.slots.iter().filter_map(|slot| slot.day).map(|rank| rank.rank);
        #[expect(clippy::cast_precision_loss)]
        let average_rank = ranks().map(|rank| rank as f64).mean()?;
        Some(RankingStats {
            cheapest_hour: ranks().min()?,
            most_expensive_hour: ranks().max()?,
            average_rank: quantity::round(average_rank, 1),
        })
    }
}

/// Extremes and average of the whole-day ranks.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct RankingStats {
    pub cheapest_hour: usize,
    pub most_expensive_hour: usize,
    pub average_rank: f64,
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Days, NaiveTime};

    use super::*;
    use crate::core::ranking::{RankingSettings, Thresholds};

    pub const ON: NaiveDate = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

    /// Quarter-hour samples of the day with the given hourly price, as published upstream.
    pub fn quarters_of(on: NaiveDate, price: impl Fn(HourLabel) -> f64) -> Vec<RawSample> {
        HourLabel::ALL
            .into_iter()
            .flat_map(|hour| {
                let opening = u32::from(hour.get()) - 1;
                [15, 30, 45, 60].into_iter().map(move |minute| {
                    let timestamp = if minute == 60 {
                        // The last quarter of the slot closes on the full hour.
                        on.and_time(NaiveTime::MIN)
                            + chrono::TimeDelta::hours(i64::from(opening) + 1)
                    } else {
                        on.and_hms_opt(opening, minute, 0).unwrap()
                    };
                    (hour, timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                })
            })
            .map(|(hour, timestamp)| RawSample::new(timestamp, price(hour)))
            .collect()
    }

    #[test]
    fn test_one_expensive_hour_with_a_missing_quarter() {
        let mut samples = quarters_of(ON, |hour| if hour.get() == 5 { 500.0 } else { 100.0 });
        assert_eq!(samples.len(), 96);

        // Drop one of the four quarters of label 5 (04:30).
        samples.retain(|sample| sample.timestamp != "2025-10-01 04:30:00");
        assert_eq!(samples.len(), 95);

        let settings = Settings::builder()
            .ranking(RankingSettings {
                day: Thresholds { n_cheap: 3, n_expensive: 1 },
                ..RankingSettings::default()
            })
            .build();
        let snapshot = DailySnapshot::try_build(ON, &samples, &settings).unwrap();
        let slot = snapshot.slot(HourLabel::new(5).unwrap());
        assert_eq!(slot.slot.n_samples, 3);
        assert_abs_diff_eq!(slot.price().unwrap().0, 500.0);
        assert_eq!(slot.day.unwrap().rank, 24);
        assert!(slot.is_day_expensive());
        assert_eq!(snapshot.slots.iter().filter(|slot| slot.is_day_expensive()).count(), 1);

        // All the others tie for the first rank.
        assert!(snapshot.slots.iter().filter(|slot| slot.hour().get() != 5).all(|slot| {
            slot.day.unwrap().rank == 1 && slot.slot.n_samples == 4
        }));
    }

    #[test]
    fn test_next_day_midnight_closes_label_24() {
        let samples = quarters_of(ON, |hour| f64::from(hour.get()));
        let last = samples.last().unwrap();
        assert_eq!(last.timestamp, "2025-10-02 00:00:00");

        let settings = Settings::builder().build();
        let snapshot = DailySnapshot::try_build(ON, &samples, &settings).unwrap();
        assert_eq!(snapshot.slot(HourLabel::LAST).slot.n_samples, 4);
        assert_abs_diff_eq!(snapshot.slot(HourLabel::LAST).price().unwrap().0, 24.0);

        // The same samples describe nothing on the next day but its opening midnight.
        let next_day = ON.checked_add_days(Days::new(1)).unwrap();
        assert!(DailySnapshot::try_build(next_day, &samples, &settings).is_err());
    }

    #[test]
    fn test_no_usable_samples() {
        let samples = [RawSample::new("garbage", 1.0)];
        let error = DailySnapshot::try_build(ON, &samples, &Settings::builder().build());
        assert!(matches!(error, Err(FetchError::MalformedPayload(_))));
    }

    #[test]
    fn test_ranking_stats() {
        let samples = quarters_of(ON, |hour| f64::from(hour.get()));
        let settings = Settings::builder().build();
        let snapshot = DailySnapshot::try_build(ON, &samples, &settings).unwrap();
        let stats = snapshot.ranking_stats().unwrap();
        assert_eq!(stats.cheapest_hour, 1);
        assert_eq!(stats.most_expensive_hour, 24);
        assert_abs_diff_eq!(stats.average_rank, 12.5);
    }
}
