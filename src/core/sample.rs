use chrono::{DateTime, MappedLocalTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::quantity::price::MegawattHourPrice;

/// Price entry as delivered by a price source, before any validation.
#[derive(Clone, Debug)]
pub struct RawSample {
    /// ISO 8601 timestamp, with or without an offset.
    pub timestamp: String,

    pub price: MegawattHourPrice,
}

impl RawSample {
    pub fn new(timestamp: impl Into<String>, price: impl Into<MegawattHourPrice>) -> Self {
        Self { timestamp: timestamp.into(), price: price.into() }
    }

    /// Validate the entry and normalize its timestamp.
    ///
    /// Timestamps without an offset are wall-clock times in `time_zone`.
    pub fn parse(&self, time_zone: Tz) -> Result<PriceSample, SampleError> {
        if !self.price.is_finite() {
            return Err(SampleError::Price(self.price.0));
        }
        let timestamp = parse_timestamp(&self.timestamp, time_zone)?;
        Ok(PriceSample { timestamp, price: self.price })
    }
}

/// Validated quarter-hour price observation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: MegawattHourPrice,
}

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("unparsable timestamp `{0}`")]
    Timestamp(String),

    #[error("`{0}` does not exist in the local time zone")]
    NonExistentLocalTime(NaiveDateTime),

    #[error("price `{0}` is not a finite number")]
    Price(f64),

    #[error("minute {0} is not on the quarter-hour grid")]
    Minute(u32),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_timestamp(raw: &str, time_zone: Tz) -> Result<DateTime<Utc>, SampleError> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(timestamp.to_utc());
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .ok_or_else(|| SampleError::Timestamp(raw.to_owned()))?;
    match time_zone.from_local_datetime(&naive) {
        MappedLocalTime::Single(timestamp) | MappedLocalTime::Ambiguous(timestamp, _) => {
            Ok(timestamp.to_utc())
        }
        MappedLocalTime::None => Err(SampleError::NonExistentLocalTime(naive)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::Europe::Warsaw;

    use super::*;

    fn utc(hour: u32, minute: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_parse_utc() {
        let sample = RawSample::new("2025-10-01T10:15:00Z", 1.0).parse(Warsaw).unwrap();
        assert_eq!(sample.timestamp, utc(10, 15));
    }

    #[test]
    fn test_parse_offset() {
        let sample = RawSample::new("2025-10-01 12:15:00+02:00", 1.0).parse(Warsaw).unwrap();
        assert_eq!(sample.timestamp, utc(10, 15));
    }

    #[test]
    fn test_parse_naive_local() {
        // Warsaw is UTC+2 in October.
        let sample = RawSample::new("2025-10-01 12:15:00", 1.0).parse(Warsaw).unwrap();
        assert_eq!(sample.timestamp, utc(10, 15));
        let sample = RawSample::new("2025-10-01T12:30", 1.0).parse(Warsaw).unwrap();
        assert_eq!(sample.timestamp.minute(), 30);
    }

    #[test]
    fn test_parse_garbage_timestamp() {
        let error = RawSample::new("yesterday", 1.0).parse(Warsaw).unwrap_err();
        assert!(matches!(error, SampleError::Timestamp(_)));
    }

    #[test]
    fn test_parse_non_existent_local_time() {
        // Spring forward: 02:00..03:00 does not exist on March 30, 2025 in Warsaw.
        let error = RawSample::new("2025-03-30 02:15:00", 1.0).parse(Warsaw).unwrap_err();
        assert!(matches!(error, SampleError::NonExistentLocalTime(_)));
    }

    #[test]
    fn test_parse_non_finite_price() {
        let error = RawSample::new("2025-10-01T10:15:00Z", f64::NAN).parse(Warsaw).unwrap_err();
        assert!(matches!(error, SampleError::Price(_)));
    }
}
