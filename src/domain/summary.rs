//! Voyage-level and annualised economics for each cost row.

use serde::{Deserialize, Serialize};

use super::config::VesselConfig;
use super::cost::CostRow;
use super::error::PipelineError;

pub const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub cost: CostRow,
    pub total_voyage_cost: f64,
    pub slot_cost: f64,
    pub annual_voyage_cost: f64,
    pub voyage_market_revenue: f64,
    pub annual_market_revenue: f64,
}

impl SummaryRow {
    pub fn annual_margin(&self) -> f64 {
        self.annual_market_revenue - self.annual_voyage_cost
    }
}

pub fn summarize_row(cost: &CostRow, config: &VesselConfig) -> Result<SummaryRow, PipelineError> {
    let summary = &cost.voyage.summary;
    let total_time = summary.total_time;
    if total_time == 0.0 {
        return Err(PipelineError::ZeroVoyageTime {
            speed: summary.speed,
        });
    }
    let slots = config.sellable_slots();
    if slots == 0.0 {
        return Err(PipelineError::NoSellableSlots);
    }

    // Swaps the charter cost already in the total for the nominal hire-based one.
    let total_voyage_cost = total_time * cost.charter_hire + (cost.total_cost - cost.charter_cost);
    let voyage_market_revenue = config.slot_revenue * slots;

    Ok(SummaryRow {
        cost: cost.clone(),
        total_voyage_cost,
        slot_cost: total_voyage_cost / slots,
        annual_voyage_cost: total_voyage_cost * DAYS_PER_YEAR / total_time,
        voyage_market_revenue,
        annual_market_revenue: voyage_market_revenue * DAYS_PER_YEAR / total_time,
    })
}

pub fn summary_table(rows: &[CostRow], config: &VesselConfig) -> Result<Vec<SummaryRow>, PipelineError> {
    let table = rows
        .iter()
        .map(|row| summarize_row(row, config))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = table.len(), "Summary table built");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::FixedCosts;
    use crate::domain::fuel::{BunkerCost, FuelledVoyage, PortFuel, SeaFuel};
    use crate::domain::speed::SpeedSummary;

    fn cost_row(total_time: f64, charter_hire: f64) -> CostRow {
        let voyage = FuelledVoyage {
            summary: SpeedSummary {
                speed: 16,
                total_time,
                ..SpeedSummary::default()
            },
            sea: SeaFuel {
                vlsfo_per_day: 0.0,
                do_per_day: 0.0,
                do_consumption: 0.0,
                vlsfo_consumption: 0.0,
            },
            port: PortFuel {
                maneuver_per_day: 0.0,
                berth_per_day: 0.0,
                maneuver_consumption: 0.0,
                berth_consumption: 0.0,
            },
            bunker: BunkerCost {
                vlsfo: 40000.0,
                diesel_oil: 10000.0,
            },
        };
        CostRow::new(
            &voyage,
            charter_hire,
            &FixedCosts {
                agency: 20000.0,
                miscellaneous: 30000.0,
            },
        )
    }

    #[test]
    fn projects_voyage_and_annual_figures() {
        let config = VesselConfig::new(2000, 75.0, 7.0, 0.0, 50.0, 1000.0);
        let row = summarize_row(&cost_row(36.5, 10000.0), &config).unwrap();

        // 36.5 days x 10000 + (365000 + 100000 - 365000)
        assert!((row.total_voyage_cost - 465000.0).abs() < 1e-6);
        assert!((row.slot_cost - 465.0).abs() < 1e-9);
        assert!((row.annual_voyage_cost - 4650000.0).abs() < 1e-6);
        assert_eq!(row.voyage_market_revenue, 1000000.0);
        assert!((row.annual_market_revenue - 10000000.0).abs() < 1e-6);
        assert!((row.annual_margin() - 5350000.0).abs() < 1e-6);
    }

    #[test]
    fn total_voyage_cost_matches_total_cost() {
        let config = VesselConfig::default();
        let row = summarize_row(&cost_row(12.0, 7000.0), &config).unwrap();
        assert!((row.total_voyage_cost - row.cost.total_cost).abs() < 1e-9);
    }

    #[test]
    fn zero_total_time_is_an_error() {
        let result = summary_table(&[cost_row(0.0, 1000.0)], &VesselConfig::default());
        assert!(matches!(result, Err(PipelineError::ZeroVoyageTime { speed: 16 })));
    }

    #[test]
    fn zero_slots_is_an_error() {
        let config = VesselConfig::new(2500, 75.0, 7.0, 827.0, 0.0, 4348.0);
        let result = summarize_row(&cost_row(10.0, 1000.0), &config);
        assert!(matches!(result, Err(PipelineError::NoSellableSlots)));
    }
}
