//! [PSE](https://raporty.pse.pl) market price (RCE) client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::{
    core::{
        sample::RawSample,
        source::{FetchError, PriceSource},
    },
    prelude::*,
    quantity::price::MegawattHourPrice,
};

const URL: &str = "https://v2.api.raporty.pse.pl/api/rce-pln";

pub struct Api(Client);

impl Api {
    pub fn try_new() -> Result<Self> {
        Ok(Self(Client::builder().timeout(Duration::from_secs(10)).build()?))
    }
}

#[async_trait]
impl PriceSource for Api {
    /// Get all the quarter-hour prices of the business day.
    #[instrument(skip_all, fields(on = %on))]
    async fn fetch_day(&self, on: NaiveDate) -> Result<Vec<RawSample>, FetchError> {
        info!("fetching…");
        let filter = format!("business_date eq '{}'", on.format("%Y-%m-%d"));
        let body = self
            .0
            .get(URL)
            .query(&[
                ("$filter", filter.as_str()),
                ("$select", "business_date,dtime,rce_pln"),
                ("$orderby", "dtime"),
            ])
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(FetchError::transport)?
            .bytes()
            .await
            .map_err(FetchError::transport)?;
        let samples = parse_page(&body)?;
        info!(n_samples = samples.len(), "fetched");
        Ok(samples)
    }
}

/// Decode the page entry by entry, so that a single bad entry does not spoil the whole day.
fn parse_page(body: &[u8]) -> Result<Vec<RawSample>, FetchError> {
    let page: Page = serde_json::from_slice(body)
        .map_err(|error| FetchError::MalformedPayload(error.to_string()))?;
    if page.value.is_empty() {
        return Err(FetchError::MalformedPayload("empty value list".to_owned()));
    }
    let samples = page
        .value
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Entry>(entry) {
            Ok(entry) => Some(RawSample::new(entry.dtime, entry.rce_pln)),
            Err(error) => {
                warn!("skipped a malformed entry: {error}");
                None
            }
        })
        .collect();
    Ok(samples)
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

#[serde_as]
#[derive(Deserialize)]
struct Entry {
    /// End of the quarter-hour delivery period, local time.
    dtime: String,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    rce_pln: MegawattHourPrice,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Local, Timelike};

    use super::*;

    #[test]
    fn test_parse_page_ok() -> Result {
        // language=JSON
        const BODY: &str = r#"
            {
                "value": [
                    {"business_date": "2025-10-01", "dtime": "2025-10-01 00:15:00", "rce_pln": 412.5},
                    {"business_date": "2025-10-01", "dtime": "2025-10-01 00:30:00", "rce_pln": "398.11"},
                    {"business_date": "2025-10-01", "dtime": "2025-10-01 00:45:00", "rce_pln": null},
                    {"business_date": "2025-10-01", "rce_pln": 1.0},
                    {"business_date": "2025-10-01", "dtime": "2025-10-01 01:00:00", "rce_pln": -5}
                ]
            }
        "#;
        let samples = parse_page(BODY.as_bytes())?;
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].timestamp, "2025-10-01 00:15:00");
        assert_abs_diff_eq!(samples[0].price.0, 412.5);
        assert_abs_diff_eq!(samples[1].price.0, 398.11);
        assert_eq!(samples[2].timestamp, "2025-10-01 01:00:00");
        assert_abs_diff_eq!(samples[2].price.0, -5.0);
        Ok(())
    }

    #[test]
    fn test_parse_page_empty() {
        for body in [r#"{"value": []}"#, "{}", "[]", "not json"] {
            assert!(
                matches!(parse_page(body.as_bytes()), Err(FetchError::MalformedPayload(_))),
                "{body}",
            );
        }
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_fetch_day_ok() -> Result {
        let today = Local::now().date_naive();
        let samples = Api::try_new()?.fetch_day(today).await?;
        assert!(samples.len() >= 92);
        assert!(samples.len() <= 100);
        let last = samples.last().unwrap().parse(chrono_tz::Europe::Warsaw)?;
        assert_eq!(last.timestamp.with_timezone(&chrono_tz::Europe::Warsaw).hour(), 0);
        Ok(())
    }
}
