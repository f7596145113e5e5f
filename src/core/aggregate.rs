use std::collections::HashMap;

use chrono::{Days, NaiveDate, Timelike};
use chrono_tz::Tz;
use itertools::Itertools;

use crate::{
    core::{
        hour::HourLabel,
        sample::{RawSample, SampleError},
    },
    prelude::*,
    quantity::price::MegawattHourPrice,
};

/// Quarter-hour prices grouped by the hourly slot they belong to.
pub type HourBuckets = HashMap<HourLabel, Vec<MegawattHourPrice>>;

/// Group the raw quarter-hour samples of the day `on` into hourly buckets.
///
/// Each sample is validated individually; malformed samples are logged and skipped.
/// Samples which belong to another day (notably the midnight sample which closes the previous
/// day's label `24`) are dropped.
#[instrument(skip_all, fields(on = %on, n_samples = samples.len()))]
pub fn aggregate_quarters(samples: &[RawSample], on: NaiveDate, time_zone: Tz) -> HourBuckets {
    let buckets: HourBuckets = samples
        .iter()
        .filter_map(|raw| match assign(raw, on, time_zone) {
            Ok(assignment) => assignment,
            Err(error) => {
                warn!(
                    timestamp = %raw.timestamp,
                    price = %raw.price,
                    "skipped malformed sample: {error}",
                );
                None
            }
        })
        .into_group_map();
    debug!(
        hours = ?buckets.keys().sorted().collect_vec(),
        n_accepted = buckets.values().map(Vec::len).sum::<usize>(),
        "aggregated",
    );
    buckets
}

/// Find the slot of the sample, or [`None`] if it belongs to another day.
fn assign(
    raw: &RawSample,
    on: NaiveDate,
    time_zone: Tz,
) -> Result<Option<(HourLabel, MegawattHourPrice)>, SampleError> {
    let sample = raw.parse(time_zone)?;
    let local = sample.timestamp.with_timezone(&time_zone);
    let (hour, minute) = (local.hour(), local.minute());
    let label = HourLabel::of_quarter(hour, minute).ok_or(SampleError::Minute(minute))?;
    let date = if (hour, minute) == (0, 0) {
        // Midnight closes the last slot of the previous day.
        local.date_naive().checked_sub_days(Days::new(1))
    } else {
        Some(local.date_naive())
    };
    if date == Some(on) {
        Ok(Some((label, sample.price)))
    } else {
        debug!(timestamp = %raw.timestamp, "sample belongs to another day");
        Ok(None)
    }
}
