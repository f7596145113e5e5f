use chrono::Utc;

use crate::{
    api::pse,
    core::{service::DailySnapshotService, settings::Settings},
    prelude::*,
    tables::{build_prices_table, build_statistics_table},
};

async fn refresh_once(settings: Settings) -> Result<DailySnapshotService<pse::Api>> {
    let mut service = DailySnapshotService::new(pse::Api::try_new()?, settings);
    service.refresh_if_due(Utc::now()).await;
    Ok(service)
}

/// Render today's and, if published, tomorrow's prices.
#[instrument(skip_all)]
pub async fn show(settings: Settings) -> Result {
    let service = refresh_once(settings).await?;
    let state = service.state();
    let Some(today) = &state.today else {
        bail!("no prices available for today");
    };
    println!("{}", build_prices_table(today));
    println!("{}", build_statistics_table(&today.statistics, service.settings().custom_peak));
    if let Some(tomorrow) = &state.tomorrow {
        println!("{}", build_prices_table(tomorrow));
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn print_attributes(settings: Settings) -> Result {
    let service = refresh_once(settings).await?;
    let attributes = service.attributes(Utc::now()).context("no prices available for today")?;
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(())
}
