use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::sample::RawSample;

/// Anything able to deliver the quarter-hour prices of a business day.
#[async_trait]
pub trait PriceSource: Sync {
    /// Fetch the raw samples published for the business day.
    async fn fetch_day(&self, on: NaiveDate) -> Result<Vec<RawSample>, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached, or it answered with an error status.
    #[error("failed to reach the price source")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The source answered, but nothing usable came out of the answer.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(error))
    }
}

#[cfg(test)]
pub mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use super::*;

    /// In-memory source which records every requested day.
    #[derive(Clone, Default)]
    pub struct FakeSource {
        pub days: Arc<Mutex<HashMap<NaiveDate, Vec<RawSample>>>>,
        pub requests: Arc<Mutex<Vec<NaiveDate>>>,
    }

    impl FakeSource {
        pub fn publish(&self, on: NaiveDate, samples: Vec<RawSample>) {
            self.days.lock().unwrap().insert(on, samples);
        }

        pub fn withdraw(&self, on: NaiveDate) {
            self.days.lock().unwrap().remove(&on);
        }

        pub fn take_requests(&self) -> Vec<NaiveDate> {
            std::mem::take(&mut *self.requests.lock().unwrap())
        }
    }

    #[async_trait]
    impl PriceSource for FakeSource {
        async fn fetch_day(&self, on: NaiveDate) -> Result<Vec<RawSample>, FetchError> {
            self.requests.lock().unwrap().push(on);
            self.days.lock().unwrap().get(&on).cloned().ok_or_else(|| {
                FetchError::transport(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not published yet",
                ))
            })
        }
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let error = FetchError::transport(std::io::Error::other("boom"));
        assert_eq!(error.to_string(), "failed to reach the price source");
        assert_eq!(std::error::Error::source(&error).unwrap().to_string(), "boom");
    }
}
