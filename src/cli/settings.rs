use chrono_tz::Tz;
use clap::Parser;

use crate::core::{
    ranking::{RankingSettings, Thresholds},
    settings::{CustomPeakRange, Settings},
};

#[derive(Parser)]
pub struct SettingsArgs {
    /// Number of the cheapest hours of the whole day to flag.
    #[clap(long, env = "CHEAP_HOURS", default_value = "3")]
    cheap_hours: usize,

    /// Number of the most expensive hours of the whole day to flag.
    #[clap(long, env = "EXPENSIVE_HOURS", default_value = "5")]
    expensive_hours: usize,

    #[clap(long, env = "CHEAP_AM_HOURS", default_value = "2")]
    cheap_am_hours: usize,

    #[clap(long, env = "EXPENSIVE_AM_HOURS", default_value = "2")]
    expensive_am_hours: usize,

    #[clap(long, env = "CHEAP_PM_HOURS", default_value = "2")]
    cheap_pm_hours: usize,

    #[clap(long, env = "EXPENSIVE_PM_HOURS", default_value = "2")]
    expensive_pm_hours: usize,

    /// Hour labels averaged as the custom peak, `start-end` with the end excluded.
    #[clap(
        long,
        env = "CUSTOM_PEAK_RANGE",
        default_value = "10-17",
        value_parser = CustomPeakRange::parse_or_default,
    )]
    custom_peak_range: CustomPeakRange,

    /// Time zone of the market.
    #[clap(long, env = "TIME_ZONE", default_value = "Europe/Warsaw")]
    time_zone: Tz,

    /// Local hour when the next day's prices get published.
    #[clap(
        long,
        env = "AFTERNOON_HOUR",
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(0..24),
    )]
    afternoon_hour: u32,
}

impl SettingsArgs {
    pub fn settings(&self) -> Settings {
        let ranking = RankingSettings::builder()
            .day(
                Thresholds::builder()
                    .n_cheap(self.cheap_hours)
                    .n_expensive(self.expensive_hours)
                    .build(),
            )
            .am(Thresholds::builder()
                .n_cheap(self.cheap_am_hours)
                .n_expensive(self.expensive_am_hours)
                .build())
            .pm(Thresholds::builder()
                .n_cheap(self.cheap_pm_hours)
                .n_expensive(self.expensive_pm_hours)
                .build())
            .build();
        Settings::builder()
            .ranking(ranking)
            .custom_peak(self.custom_peak_range)
            .time_zone(self.time_zone)
            .afternoon_hour(self.afternoon_hour)
            .build()
    }
}
