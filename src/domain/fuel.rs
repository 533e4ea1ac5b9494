//! Fuel burn and bunker cost per speed.
//!
//! VLSFO covers open-sea time outside the ECA and maneuvering; diesel oil covers
//! ECA time and berth time.

use serde::{Deserialize, Serialize};

use super::config::{DieselOil, FuelOil, VesselConfig};
use super::entities::{FuelType, SizeClass};
use super::error::PipelineError;
use super::reference::FuelCurve;
use super::speed::SpeedSummary;

/// Sea-passage consumption in tonnes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeaFuel {
    pub vlsfo_per_day: f64,
    pub do_per_day: f64,
    pub do_consumption: f64,
    pub vlsfo_consumption: f64,
}

/// Consumption while maneuvering and at berth, in tonnes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortFuel {
    pub maneuver_per_day: f64,
    pub berth_per_day: f64,
    pub maneuver_consumption: f64,
    pub berth_consumption: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BunkerCost {
    pub vlsfo: f64,
    pub diesel_oil: f64,
}

impl BunkerCost {
    pub fn total(&self) -> f64 {
        self.vlsfo + self.diesel_oil
    }
}

/// A per-speed summary with its fuel figures layered on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelledVoyage {
    pub summary: SpeedSummary,
    pub sea: SeaFuel,
    pub port: PortFuel,
    pub bunker: BunkerCost,
}

pub fn sea_fuel(
    summary: &SpeedSummary,
    curve: &FuelCurve,
    size: SizeClass,
    diesel_oil: &DieselOil,
) -> Result<SeaFuel, PipelineError> {
    let vlsfo_per_day = curve.consumption(FuelType::Vlsfo, size, summary.speed)?;
    // DO is tabulated at its own reference speed, not the voyage speed.
    let do_per_day = curve.consumption(FuelType::DieselOil, size, diesel_oil.speed)?;

    Ok(SeaFuel {
        vlsfo_per_day,
        do_per_day,
        do_consumption: do_per_day * summary.eca_time,
        vlsfo_consumption: vlsfo_per_day * (summary.sea_time - summary.eca_time),
    })
}

pub fn port_fuel(summary: &SpeedSummary, diesel_oil: &DieselOil, fuel_oil: &FuelOil) -> PortFuel {
    PortFuel {
        maneuver_per_day: fuel_oil.maneuver_consumption_per_day,
        berth_per_day: diesel_oil.berth_consumption_per_day,
        maneuver_consumption: fuel_oil.maneuver_consumption_per_day * summary.maneuver_time,
        berth_consumption: diesel_oil.berth_consumption_per_day * summary.berth_time,
    }
}

pub fn bunker_cost(
    sea: &SeaFuel,
    port: &PortFuel,
    diesel_oil: &DieselOil,
    fuel_oil: &FuelOil,
) -> BunkerCost {
    BunkerCost {
        vlsfo: (sea.vlsfo_consumption + port.maneuver_consumption) * fuel_oil.bunker_price,
        diesel_oil: (sea.do_consumption + port.berth_consumption) * diesel_oil.bunker_price,
    }
}

/// Applies the whole fuel model to every per-speed summary.
pub fn apply_fuel_model(
    summaries: &[SpeedSummary],
    curve: &FuelCurve,
    config: &VesselConfig,
    diesel_oil: &DieselOil,
    fuel_oil: &FuelOil,
) -> Result<Vec<FuelledVoyage>, PipelineError> {
    let size = config.size_class();
    summaries
        .iter()
        .map(|summary| {
            let sea = sea_fuel(summary, curve, size, diesel_oil)?;
            if sea.vlsfo_consumption < 0.0 {
                tracing::warn!(
                    speed = summary.speed,
                    eca_time = summary.eca_time,
                    sea_time = summary.sea_time,
                    "ECA time exceeds sea time; VLSFO consumption is negative"
                );
            }
            let port = port_fuel(summary, diesel_oil, fuel_oil);
            let bunker = bunker_cost(&sea, &port, diesel_oil, fuel_oil);
            Ok(FuelledVoyage {
                summary: summary.clone(),
                sea,
                port,
                bunker,
            })
        })
        .collect()
}
