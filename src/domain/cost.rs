//! Crosses each fuelled voyage with every candidate charter hire.

use serde::{Deserialize, Serialize};

use super::config::{FixedCosts, VesselConfig};
use super::fuel::FuelledVoyage;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub voyage: FuelledVoyage,
    /// Daily hire rate.
    pub charter_hire: f64,
    pub charter_cost: f64,
    pub agency_cost: f64,
    pub miscellaneous_cost: f64,
    /// Charter + agency + miscellaneous + port handling + both bunker costs.
    pub total_cost: f64,
}

impl CostRow {
    pub fn new(voyage: &FuelledVoyage, charter_hire: f64, costs: &FixedCosts) -> Self {
        let charter_cost = voyage.summary.total_time * charter_hire;
        let total_cost = charter_cost
            + costs.agency
            + costs.miscellaneous
            + voyage.summary.port_cost
            + voyage.bunker.vlsfo
            + voyage.bunker.diesel_oil;
        Self {
            voyage: voyage.clone(),
            charter_hire,
            charter_cost,
            agency_cost: costs.agency,
            miscellaneous_cost: costs.miscellaneous,
            total_cost,
        }
    }
}

/// `voyages × charter_hires` rows, hire rates varying fastest.
pub fn total_costs(
    voyages: &[FuelledVoyage],
    costs: &FixedCosts,
    config: &VesselConfig,
) -> Vec<CostRow> {
    let mut rows = Vec::with_capacity(voyages.len() * config.charter_hires.len());
    for voyage in voyages {
        for &charter_hire in &config.charter_hires {
            rows.push(CostRow::new(voyage, charter_hire, costs));
        }
    }
    tracing::debug!(rows = rows.len(), "Cost table built");
    rows
}
