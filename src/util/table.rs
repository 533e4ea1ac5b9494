//! Plain-text rendering of the port, summation and cost tables.

use crate::domain::{FuelledVoyage, PortCall, SummaryRow};

pub struct TextTable {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(column, (cell, w))| {
                    // First column is a label, the rest are figures.
                    if column == 0 {
                        format!("{cell:<w$}")
                    } else {
                        format!("{cell:>w$}")
                    }
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

/// Placeholder for a figure that could not be computed.
const MISSING: &str = "n/a";

/// Whole units with thousands separators.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_days(value: f64) -> String {
    format!("{value:.2}")
}

fn format_optional_cost(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| MISSING.to_string())
}

/// Port, hours at port, cost and leg distance.
pub fn port_call_table(calls: &[PortCall]) -> TextTable {
    let mut table = TextTable::new(vec![
        "Port Code",
        "Maneuver Time",
        "Wait Time",
        "Berth Time",
        "Port Cost",
        "Distance (mi)",
    ]);
    for call in calls {
        table.push(vec![
            call.port_code.clone(),
            format!("{:.1}", call.maneuver_time),
            format!("{:.1}", call.wait_time),
            format!("{:.1}", call.berth_time),
            format_optional_cost(call.port_cost),
            format!("{:.0}", call.distance),
        ]);
    }
    table
}

/// Per-speed distances (miles), times (days), fuel (tonnes) and bunker cost.
pub fn speed_table(voyages: &[FuelledVoyage]) -> TextTable {
    let mut table = TextTable::new(vec![
        "Speed",
        "Sea Time",
        "Maneuver",
        "Wait",
        "Berth",
        "ECA Time",
        "Total Time",
        "Sea Dist",
        "VLSFO t",
        "DO t",
        "VLSFO Cost",
        "DO Cost",
    ]);
    for voyage in voyages {
        let summary = &voyage.summary;
        table.push(vec![
            format!("{} kn", summary.speed),
            format_days(summary.sea_time),
            format_days(summary.maneuver_time),
            format_days(summary.wait_time),
            format_days(summary.berth_time),
            format_days(summary.eca_time),
            format_days(summary.total_time),
            format!("{:.0}", summary.sea_distance),
            format!("{:.1}", voyage.sea.vlsfo_consumption + voyage.port.maneuver_consumption),
            format!("{:.1}", voyage.sea.do_consumption + voyage.port.berth_consumption),
            format_amount(voyage.bunker.vlsfo),
            format_amount(voyage.bunker.diesel_oil),
        ]);
    }
    table
}

/// Speed × charter hire economics.
pub fn cost_table(rows: &[SummaryRow]) -> TextTable {
    let mut table = TextTable::new(vec![
        "Speed",
        "Charter Hire",
        "Charter Cost",
        "Total Cost",
        "Voyage Cost",
        "Slot Cost",
        "Annual Cost",
        "Annual Revenue",
    ]);
    for row in rows {
        table.push(vec![
            format!("{} kn", row.cost.voyage.summary.speed),
            format_amount(row.cost.charter_hire),
            format_amount(row.cost.charter_cost),
            format_amount(row.cost.total_cost),
            format_amount(row.total_voyage_cost),
            format!("{:.2}", row.slot_cost),
            format_amount(row.annual_voyage_cost),
            format_amount(row.annual_market_revenue),
        ]);
    }
    table
}
