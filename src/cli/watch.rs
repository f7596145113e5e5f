use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::{
    signal,
    time::{MissedTickBehavior, interval},
};

use crate::{
    api::pse,
    core::{service::DailySnapshotService, settings::Settings},
    prelude::*,
};

#[derive(Parser)]
pub struct WatchArgs {
    /// How often the refresh policy is evaluated.
    #[clap(long, env = "POLLING_INTERVAL", default_value = "30s")]
    polling_interval: humantime::Duration,
}

impl WatchArgs {
    pub fn polling_interval(&self) -> Duration {
        self.polling_interval.into()
    }

    /// Tick until interrupted.
    pub async fn run(self, settings: Settings) -> Result {
        let mut service = DailySnapshotService::new(pse::Api::try_new()?, settings);
        let mut interval = interval(self.polling_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                result = &mut ctrl_c => {
                    result.context("failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    return Ok(());
                }
            }

            let now = Utc::now();
            service.refresh_if_due(now).await;
            if !service.is_available(now) {
                warn!("the current price is unavailable");
                continue;
            }
            if let (Some(price), Some(attributes)) =
                (service.current_value(now), service.attributes(now))
            {
                info!(
                    %price,
                    hour = %attributes.current_hour,
                    rank = ?attributes.current_hour_rank,
                    next_price = ?attributes.next_price,
                    "current",
                );
            }
        }
    }
}
