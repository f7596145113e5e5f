use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    ranking::WindowRank,
    settings::CustomPeakRange,
    snapshot::DailySnapshot,
    statistics::DailyStatistics,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_prices_table(snapshot: &DailySnapshot) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Hour", "Start", "Price", "Quarters", "Rank", "Pct", "Half"]);
    for slot in &snapshot.slots {
        let percentile = slot.percentile.map(|percentile| format!("{percentile:.1}"));
        let price_cell = match slot.price() {
            Some(price) => Cell::new(price).fg(rank_color(slot.day)),
            None => Cell::new("n/a").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![
            Cell::new(snapshot.date.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(slot.hour()).set_alignment(CellAlignment::Right),
            Cell::new(slot.hour().window_start()).add_attribute(Attribute::Dim),
            price_cell.set_alignment(CellAlignment::Right),
            Cell::new(slot.slot.n_samples).set_alignment(CellAlignment::Right).fg(
                if slot.slot.n_samples == 4 { Color::Reset } else { Color::DarkYellow },
            ),
            rank_cell(slot.day),
            Cell::new(percentile.unwrap_or_default())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            rank_cell(slot.half),
        ]);
    }
    table
}

pub fn build_statistics_table(
    statistics: &DailyStatistics,
    custom_peak: CustomPeakRange,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Statistic", "Value"]);
    let custom_peak = format!("Custom peak {custom_peak}");
    for (name, value) in [
        ("Average", statistics.mean),
        ("Median", statistics.median),
        ("Min", statistics.min),
        ("Max", statistics.max),
        ("Night 00-08", statistics.am_night_average),
        ("Day 08-20", statistics.day_average),
        ("Night 20-24", statistics.pm_night_average),
        (custom_peak.as_str(), statistics.custom_peak_average),
    ] {
        table.add_row(vec![
            Cell::new(name),
            value.map_or_else(
                || Cell::new("n/a").add_attribute(Attribute::Dim),
                |value| Cell::new(value).set_alignment(CellAlignment::Right),
            ),
        ]);
    }
    table
}

/// Green for the cheap hours, red for the expensive ones, and nothing when both or neither.
const fn rank_color(rank: Option<WindowRank>) -> Color {
    match rank {
        Some(WindowRank { is_cheap: true, is_expensive: false, .. }) => Color::Green,
        Some(WindowRank { is_cheap: false, is_expensive: true, .. }) => Color::Red,
        _ => Color::Reset,
    }
}

fn rank_cell(rank: Option<WindowRank>) -> Cell {
    rank.map_or_else(
        || Cell::new(""),
        |inner| Cell::new(inner.rank).set_alignment(CellAlignment::Right).fg(rank_color(rank)),
    )
}
