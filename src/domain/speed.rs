//! Replicates the port call table per candidate speed and sums it per speed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::VesselConfig;
use super::entities::{Knots, PortCode};
use super::tariff::PortCall;

pub const HOURS_PER_DAY: f64 = 24.0;

/// One leg at one speed. Times are in days.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedLegRow {
    pub speed: Knots,
    /// `None` on the synthetic ECA row.
    pub port_code: Option<PortCode>,
    pub sea_time: f64,
    pub maneuver_time: f64,
    pub wait_time: f64,
    pub berth_time: f64,
    pub port_cost: f64,
    pub sea_distance: f64,
    pub eca_distance: f64,
    pub eca_time: f64,
}

/// Column sums of every [`SpeedLegRow`] for one speed. Times are in days.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedSummary {
    pub speed: Knots,
    pub sea_time: f64,
    pub maneuver_time: f64,
    pub wait_time: f64,
    pub berth_time: f64,
    pub port_cost: f64,
    pub sea_distance: f64,
    pub eca_distance: f64,
    pub eca_time: f64,
    /// Sea + maneuver + wait + berth + ECA time.
    pub total_time: f64,
}

impl SpeedSummary {
    fn empty(speed: Knots) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    fn add(&mut self, row: &SpeedLegRow) {
        self.sea_time += row.sea_time;
        self.maneuver_time += row.maneuver_time;
        self.wait_time += row.wait_time;
        self.berth_time += row.berth_time;
        self.port_cost += row.port_cost;
        self.sea_distance += row.sea_distance;
        self.eca_distance += row.eca_distance;
        self.eca_time += row.eca_time;
    }
}

/// For each configured speed: a synthetic ECA row, then one row per port call.
///
/// Produces `speeds × (calls + 1)` rows, grouped by speed in configuration order.
pub fn expand_speeds(calls: &[PortCall], config: &VesselConfig) -> Vec<SpeedLegRow> {
    let mut rows = Vec::with_capacity(config.speeds.len() * (calls.len() + 1));

    for &speed in &config.speeds {
        let knots = speed as f64;
        rows.push(SpeedLegRow {
            speed,
            port_code: None,
            sea_time: 0.0,
            maneuver_time: 0.0,
            wait_time: 0.0,
            berth_time: 0.0,
            port_cost: 0.0,
            sea_distance: 0.0,
            eca_distance: config.eca_distance,
            eca_time: config.eca_distance / knots / HOURS_PER_DAY,
        });

        for call in calls {
            rows.push(SpeedLegRow {
                speed,
                port_code: Some(call.port_code.clone()),
                sea_time: call.distance / knots / HOURS_PER_DAY,
                maneuver_time: call.maneuver_time / HOURS_PER_DAY,
                wait_time: call.wait_time / HOURS_PER_DAY,
                berth_time: call.berth_time / HOURS_PER_DAY,
                port_cost: call.port_cost.unwrap_or(0.0),
                sea_distance: call.distance,
                eca_distance: 0.0,
                eca_time: 0.0,
            });
        }
    }

    tracing::debug!(rows = rows.len(), "Expanded port calls over speeds");
    rows
}

/// Groups `rows` by speed (ascending) and sums every column.
pub fn summarize_speeds(rows: &[SpeedLegRow]) -> Vec<SpeedSummary> {
    let mut groups: BTreeMap<Knots, SpeedSummary> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.speed)
            .or_insert_with(|| SpeedSummary::empty(row.speed))
            .add(row);
    }

    groups
        .into_values()
        .map(|mut summary| {
            summary.total_time = summary.sea_time
                + summary.maneuver_time
                + summary.wait_time
                + summary.berth_time
                + summary.eca_time;
            summary
        })
        .collect()
}

/// Expansion and aggregation in one step: one summary per configured speed.
pub fn calculate_totals(calls: &[PortCall], config: &VesselConfig) -> Vec<SpeedSummary> {
    summarize_speeds(&expand_speeds(calls, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(code: &str, distance: f64, hours: f64, cost: Option<f64>) -> PortCall {
        PortCall {
            port_code: code.to_string(),
            matched: true,
            maneuver_time: hours,
            wait_time: hours,
            berth_time: hours,
            port_cost: cost,
            distance,
        }
    }

    fn calls() -> Vec<PortCall> {
        vec![
            call("AAAAA", 0.0, 6.0, Some(1000.0)),
            call("BBBBB", 480.0, 12.0, None),
            call("CCCCC", 240.0, 0.0, Some(0.0)),
        ]
    }

    fn config(speeds: Vec<Knots>) -> VesselConfig {
        VesselConfig {
            speeds,
            eca_distance: 120.0,
            ..VesselConfig::default()
        }
    }

    #[test]
    fn row_counts_follow_speeds_and_legs() {
        let config = config(vec![10, 20, 12]);
        let rows = expand_speeds(&calls(), &config);
        assert_eq!(rows.len(), 3 * (3 + 1));
        assert_eq!(rows.iter().filter(|row| row.port_code.is_none()).count(), 3);

        let summaries = summarize_speeds(&rows);
        assert_eq!(summaries.len(), 3);
        let speeds: Vec<Knots> = summaries.iter().map(|s| s.speed).collect();
        assert_eq!(speeds, vec![10, 12, 20]);
    }

    #[test]
    fn eca_row_leads_each_speed_block() {
        let rows = expand_speeds(&calls(), &config(vec![10]));
        let eca = &rows[0];
        assert_eq!(eca.port_code, None);
        assert_eq!(eca.eca_distance, 120.0);
        assert!((eca.eca_time - 0.5).abs() < 1e-12);
        assert_eq!(eca.sea_time, 0.0);
        assert!(rows[1..].iter().all(|row| row.eca_time == 0.0));
    }

    #[test]
    fn sums_are_in_days() {
        let summaries = calculate_totals(&calls(), &config(vec![10]));
        let summary = &summaries[0];

        // 720 miles at 10 knots = 72 h = 3 days.
        assert!((summary.sea_time - 3.0).abs() < 1e-12);
        // 18 h of each port time = 0.75 days.
        assert!((summary.maneuver_time - 0.75).abs() < 1e-12);
        assert!((summary.wait_time - 0.75).abs() < 1e-12);
        assert!((summary.berth_time - 0.75).abs() < 1e-12);
        assert!((summary.eca_time - 0.5).abs() < 1e-12);
        assert_eq!(summary.port_cost, 1000.0);
        assert_eq!(summary.sea_distance, 720.0);
        assert_eq!(summary.eca_distance, 120.0);
        assert!((summary.total_time - (3.0 + 0.75 * 3.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn empty_call_table_still_carries_the_eca_leg() {
        let summaries = calculate_totals(&[], &config(vec![10]));
        assert_eq!(summaries.len(), 1);
        assert!((summaries[0].total_time - 0.5).abs() < 1e-12);
    }
}
