//! Scenario configuration: vessel, fuel classes, fixed costs and tariff policy.
//!
//! Percent inputs are accepted on the 0–100 scale (as analysts type them) and
//! stored as fractions.

use serde::{Deserialize, Serialize};

use super::entities::{Knots, SizeClass};
use super::error::PipelineError;

pub const DEFAULT_SPEEDS: [Knots; 4] = [14, 16, 18, 21];

pub const DEFAULT_CHARTER_HIRES: [f64; 20] = [
    0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0, 10000.0,
    20000.0, 30000.0, 40000.0, 45000.0, 50000.0, 60000.0, 70000.0, 80000.0, 100000.0,
];

/// Capacity tiers offered to the analyst; port and fuel tables are keyed by these.
pub const CAPACITY_TIERS: [u32; 6] = [2500, 8000, 10000, 15000, 20000, 24000];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Nominal capacity in TEU; doubles as the size class for table lookups.
    pub capacity: u32,
    pub forty_feet_fraction: f64,
    /// Sailing frequency in days. Carried with the scenario, not used by the cost model.
    pub frequency: f64,
    /// Extra distance sailed inside an emission control area, in miles.
    pub eca_distance: f64,
    /// Share of capacity sold as TEU slots.
    pub teu_fraction: f64,
    /// Market price of one slot.
    pub slot_revenue: f64,
    pub speeds: Vec<Knots>,
    pub charter_hires: Vec<f64>,
    /// Fallback port times in hours.
    pub maneuver_time: f64,
    pub wait_time: f64,
    pub berth_time: f64,
}

impl VesselConfig {
    pub fn new(
        capacity: u32,
        forty_feet_percentage: f64,
        frequency: f64,
        eca_distance: f64,
        teu_percent: f64,
        slot_revenue: f64,
    ) -> Self {
        Self {
            capacity,
            forty_feet_fraction: forty_feet_percentage * 0.01,
            frequency,
            eca_distance,
            teu_fraction: teu_percent * 0.01,
            slot_revenue,
            ..Self::default()
        }
    }

    pub fn size_class(&self) -> SizeClass {
        SizeClass(self.capacity)
    }

    /// TEU slots available for sale on one voyage.
    pub fn sellable_slots(&self) -> f64 {
        self.capacity as f64 * self.teu_fraction
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.speeds.is_empty() {
            return Err(invalid("at least one candidate speed is required"));
        }
        if self.speeds.iter().any(|speed| *speed == 0) {
            return Err(invalid("candidate speeds must be positive"));
        }
        let mut seen = self.speeds.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.speeds.len() {
            return Err(invalid("candidate speeds must be unique"));
        }
        if self.charter_hires.is_empty() {
            return Err(invalid("at least one charter hire rate is required"));
        }
        if self
            .charter_hires
            .iter()
            .any(|hire| !hire.is_finite() || *hire < 0.0)
        {
            return Err(invalid("charter hire rates must be finite and non-negative"));
        }
        for (name, value) in [
            ("forty_feet_fraction", self.forty_feet_fraction),
            ("teu_fraction", self.teu_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{name} must lie between 0 and 1, got {value}")));
            }
        }
        for (name, value) in [
            ("eca_distance", self.eca_distance),
            ("maneuver_time", self.maneuver_time),
            ("wait_time", self.wait_time),
            ("berth_time", self.berth_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            capacity: 2500,
            forty_feet_fraction: 0.75,
            frequency: 7.0,
            eca_distance: 827.0,
            teu_fraction: 0.75,
            slot_revenue: 4348.0,
            speeds: DEFAULT_SPEEDS.to_vec(),
            charter_hires: DEFAULT_CHARTER_HIRES.to_vec(),
            maneuver_time: 6.0,
            wait_time: 2.0,
            berth_time: 12.0,
        }
    }
}

fn invalid(message: &str) -> PipelineError {
    PipelineError::InvalidConfig(message.to_string())
}

/// Diesel oil: burned inside the ECA and at berth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DieselOil {
    /// Reference speed for the ECA consumption lookup.
    pub speed: Knots,
    pub bunker_price: f64,
    pub berth_consumption_per_day: f64,
}

impl DieselOil {
    pub fn with_price(bunker_price: f64) -> Self {
        Self {
            bunker_price,
            ..Self::default()
        }
    }
}

impl Default for DieselOil {
    fn default() -> Self {
        Self {
            speed: 10,
            bunker_price: 697.0,
            berth_consumption_per_day: 4.0,
        }
    }
}

/// VLSFO: burned at sea outside the ECA and while maneuvering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelOil {
    pub speed: Knots,
    pub bunker_price: f64,
    pub maneuver_consumption_per_day: f64,
}

impl FuelOil {
    pub fn with_price(bunker_price: f64) -> Self {
        Self {
            bunker_price,
            ..Self::default()
        }
    }
}

impl Default for FuelOil {
    fn default() -> Self {
        Self {
            speed: 21,
            bunker_price: 565.0,
            maneuver_consumption_per_day: 8.0,
        }
    }
}

/// Per-voyage costs that do not depend on speed or hire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCosts {
    pub agency: f64,
    pub miscellaneous: f64,
}

impl Default for FixedCosts {
    fn default() -> Self {
        Self {
            agency: 25000.0,
            miscellaneous: 107680.0,
        }
    }
}

/// What to do when a port call has no handling cost in the tariff table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPortCost {
    /// Keep the cost unresolved and count it as nothing in the sums.
    #[default]
    Zero,
    /// Abort the request and name the port.
    Reject,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffPolicy {
    pub missing_port_cost: MissingPortCost,
}

/// Everything a user chooses for one run, as loaded from a scenario file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub vessel: VesselConfig,
    pub diesel_oil: DieselOil,
    pub fuel_oil: FuelOil,
    pub costs: FixedCosts,
    pub tariff: TariffPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_stored_as_fractions() {
        let config = VesselConfig::new(8000, 40.0, 7.0, 500.0, 90.0, 1200.0);
        assert_eq!(config.size_class(), SizeClass(8000));
        assert!((config.forty_feet_fraction - 0.40).abs() < 1e-12);
        assert!((config.teu_fraction - 0.90).abs() < 1e-12);
        assert!((config.sellable_slots() - 7200.0).abs() < 1e-9);
        assert_eq!(config.speeds, DEFAULT_SPEEDS.to_vec());
        assert_eq!(config.charter_hires.len(), 20);
    }

    #[test]
    fn defaults_match_the_published_scenario() {
        let config = VesselConfig::default();
        assert_eq!(config.capacity, 2500);
        assert_eq!(config.eca_distance, 827.0);
        assert_eq!(config.maneuver_time, 6.0);
        assert_eq!(config.wait_time, 2.0);
        assert_eq!(config.berth_time, 12.0);
        assert_eq!(config.charter_hires.first(), Some(&0.0));
        assert_eq!(config.charter_hires.last(), Some(&100000.0));
        assert!(config.validate().is_ok());

        assert_eq!(DieselOil::default().speed, 10);
        assert_eq!(FuelOil::default().speed, 21);
        assert_eq!(FixedCosts::default().miscellaneous, 107680.0);
    }

    #[test]
    fn validate_rejects_bad_speed_lists() {
        let mut config = VesselConfig::default();
        config.speeds = vec![];
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));

        config.speeds = vec![14, 0];
        assert!(config.validate().is_err());

        config.speeds = vec![14, 16, 14];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_fractions() {
        let config = VesselConfig::new(2500, 75.0, 7.0, 827.0, 150.0, 4348.0);
        assert!(config.validate().is_err());

        let mut config = VesselConfig::default();
        config.charter_hires = vec![-1.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn scenario_file_overrides_only_given_fields() {
        let json = r#"{
            "vessel": { "capacity": 10000, "speeds": [12, 15] },
            "diesel_oil": { "bunker_price": 750.0 },
            "tariff": { "missing_port_cost": "reject" }
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.vessel.capacity, 10000);
        assert_eq!(scenario.vessel.speeds, vec![12, 15]);
        assert_eq!(scenario.vessel.eca_distance, 827.0);
        assert_eq!(scenario.diesel_oil.bunker_price, 750.0);
        assert_eq!(scenario.diesel_oil.speed, 10);
        assert_eq!(scenario.fuel_oil, FuelOil::default());
        assert_eq!(scenario.tariff.missing_port_cost, MissingPortCost::Reject);
    }
}
