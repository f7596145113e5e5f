use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::{
    core::{
        attributes::Attributes,
        hour::HourLabel,
        ranking::RankedHourSlot,
        settings::Settings,
        snapshot::DailySnapshot,
        source::{FetchError, PriceSource},
    },
    prelude::*,
    quantity::price::MegawattHourPrice,
};

/// Everything the service remembers between the ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceState {
    pub today: Option<DailySnapshot>,
    pub tomorrow: Option<DailySnapshot>,

    /// Last time today's prices got successfully fetched.
    pub last_fetched_at: Option<DateTime<Utc>>,

    /// Local date of the last refresh attempt at the afternoon hour, successful or not.
    pub last_afternoon_refresh: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum RefreshReason {
    /// No snapshot yet, or the date has rolled over.
    Rollover,

    /// Next day's prices are expected to be published.
    Afternoon,
}

/// Owns the price source and the state, and answers the queries against the wall-clock time.
///
/// The refresh takes `&mut self`, so the readers never observe a half-done refresh.
pub struct DailySnapshotService<S> {
    source: S,
    settings: Settings,
    state: ServiceState,
}

impl<S: PriceSource> DailySnapshotService<S> {
    pub fn new(source: S, settings: Settings) -> Self {
        Self { source, settings, state: ServiceState::default() }
    }

    pub const fn state(&self) -> &ServiceState {
        &self.state
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Refetch the prices if the wall-clock policy says so.
    ///
    /// Failures are logged and the previous snapshots stay in place.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn refresh_if_due(&mut self, now: DateTime<Utc>) {
        let local = self.local(now);
        let Some(reason) = self.refresh_reason(&local) else {
            trace!("not due");
            return;
        };
        let today = local.date_naive();
        info!(?reason, %today, "refreshing…");
        if reason == RefreshReason::Afternoon {
            // Attempted once per day, whatever the outcome.
            self.state.last_afternoon_refresh = Some(today);
        }

        let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
            error!(%today, "the calendar has run out");
            return;
        };
        // Yesterday's «tomorrow» is never served as today.
        if self.state.tomorrow.as_ref().is_some_and(|snapshot| snapshot.date != tomorrow) {
            self.state.tomorrow = None;
        }

        if let Some(snapshot) = self.fetch_snapshot(today).await {
            self.state.today = Some(snapshot);
            self.state.last_fetched_at = Some(now);
        }
        if local.hour() >= self.settings.afternoon_hour
            && let Some(snapshot) = self.fetch_snapshot(tomorrow).await
        {
            self.state.tomorrow = Some(snapshot);
        }
    }

    /// Price of the current hour, [`None`] when it is unknown.
    pub fn current_value(&self, now: DateTime<Utc>) -> Option<MegawattHourPrice> {
        self.current_slot(now).and_then(RankedHourSlot::price)
    }

    /// Whether the current hour has a price.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.current_slot(now).is_some_and(|slot| slot.price().is_some())
    }

    pub fn attributes(&self, now: DateTime<Utc>) -> Option<Attributes> {
        Attributes::project(&self.state, &self.settings, now)
    }

    fn current_slot(&self, now: DateTime<Utc>) -> Option<&RankedHourSlot> {
        let hour = HourLabel::of_wall_clock(self.local(now).hour());
        self.state.today.as_ref().map(|today| today.slot(hour))
    }

    fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.settings.time_zone)
    }

    fn refresh_reason(&self, local: &DateTime<Tz>) -> Option<RefreshReason> {
        let today = local.date_naive();
        if local.hour() == self.settings.afternoon_hour
            && self.state.last_afternoon_refresh != Some(today)
        {
            Some(RefreshReason::Afternoon)
        } else if self.state.today.as_ref().is_none_or(|snapshot| snapshot.date != today) {
            Some(RefreshReason::Rollover)
        } else {
            None
        }
    }

    #[instrument(skip_all, fields(on = %on))]
    async fn fetch_snapshot(&self, on: NaiveDate) -> Option<DailySnapshot> {
        let result = match self.source.fetch_day(on).await {
            Ok(samples) => DailySnapshot::try_build(on, &samples, &self.settings),
            Err(error) => Err(error),
        };
        match result {
            Ok(snapshot) => {
                info!(mean = ?snapshot.statistics.mean, "refreshed");
                Some(snapshot)
            }
            Err(error @ FetchError::Transport(_)) => {
                error!("failed to fetch: {:#}", Error::from(error));
                None
            }
            Err(error @ FetchError::MalformedPayload(_)) => {
                warn!("no data: {error}");
                None
            }
        }
    }
}
