use std::fmt;

use serde::{Deserialize, Serialize};

/// UN/LOCODE-style port identifier as it appears in the reference tables.
pub type PortCode = String;

/// Vessel speed in knots. Fuel curves are tabulated per whole knot.
pub type Knots = u32;

/// A point given as longitude first, matching the routing service's GeoJSON order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}

/// Vessel capacity tier in TEU. Port tariffs and fuel curves are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeClass(pub u32);

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TEU", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelType {
    /// Very-low-sulfur fuel oil. Tables label it `FO`.
    #[serde(rename = "FO", alias = "VLSFO")]
    Vlsfo,
    #[serde(rename = "DO")]
    DieselOil,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Vlsfo => write!(f, "VLSFO"),
            FuelType::DieselOil => write!(f, "DO"),
        }
    }
}

/// Coordinates for one port code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortLocation {
    pub code: PortCode,
    pub name: Option<String>,
    pub position: LonLat,
}

/// Port-call attributes for one (port, size class) pair. Times are in hours.
///
/// Numeric fields stay optional: the tariff join fills times from configuration,
/// the handling cost is governed by [`TariffPolicy`](super::config::TariffPolicy).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortTariff {
    pub code: PortCode,
    pub name: Option<String>,
    pub size: SizeClass,
    pub maneuver_time: Option<f64>,
    pub wait_time: Option<f64>,
    pub berth_time: Option<f64>,
    pub port_cost: Option<f64>,
}

/// Daily consumption in tonnes for one fuel at one speed and size class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelCurveEntry {
    #[serde(rename = "type")]
    pub fuel: FuelType,
    pub size: SizeClass,
    pub speed: Knots,
    pub consumption: f64,
}
