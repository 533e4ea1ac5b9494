//! Keyed views over the loaded reference tables.

use std::collections::{hash_map::Entry, HashMap};

use super::entities::{
    FuelCurveEntry, FuelType, Knots, LonLat, PortCode, PortLocation, PortTariff, SizeClass,
};
use super::error::PipelineError;

/// Port code -> coordinates. The first row for a code wins.
#[derive(Clone, Debug, Default)]
pub struct PortCoordinates {
    by_code: HashMap<PortCode, PortLocation>,
}

impl PortCoordinates {
    pub fn from_rows(rows: impl IntoIterator<Item = PortLocation>) -> Self {
        let mut by_code = HashMap::new();
        for row in rows {
            if let Entry::Vacant(slot) = by_code.entry(row.code.clone()) {
                slot.insert(row);
            }
        }
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&PortLocation> {
        self.by_code.get(code)
    }

    pub fn position(&self, code: &str) -> Result<LonLat, PipelineError> {
        self.get(code)
            .map(|location| location.position)
            .ok_or_else(|| PipelineError::UnknownPort(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// (port code, size class) -> tariff. Later rows replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct PortTariffs {
    by_key: HashMap<(PortCode, SizeClass), PortTariff>,
}

impl PortTariffs {
    pub fn from_rows(rows: impl IntoIterator<Item = PortTariff>) -> Self {
        let mut by_key = HashMap::new();
        for row in rows {
            by_key.insert((row.code.clone(), row.size), row);
        }
        Self { by_key }
    }

    pub fn get(&self, code: &str, size: SizeClass) -> Option<&PortTariff> {
        self.by_key.get(&(code.to_string(), size))
    }

    /// Distinct port codes, sorted. These are the choices a route picker offers.
    pub fn port_codes(&self) -> Vec<PortCode> {
        let mut codes: Vec<PortCode> = self.by_key.keys().map(|(code, _)| code.clone()).collect();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// (fuel, size class, speed) -> tonnes per day.
#[derive(Clone, Debug, Default)]
pub struct FuelCurve {
    by_key: HashMap<(FuelType, SizeClass, Knots), f64>,
}

impl FuelCurve {
    pub fn from_rows(rows: impl IntoIterator<Item = FuelCurveEntry>) -> Self {
        let mut by_key = HashMap::new();
        for row in rows {
            // First match wins, like a filtered `.iloc[0]` lookup.
            by_key
                .entry((row.fuel, row.size, row.speed))
                .or_insert(row.consumption);
        }
        Self { by_key }
    }

    pub fn consumption(
        &self,
        fuel: FuelType,
        size: SizeClass,
        speed: Knots,
    ) -> Result<f64, PipelineError> {
        self.by_key
            .get(&(fuel, size, speed))
            .copied()
            .ok_or(PipelineError::MissingFuelCurve { fuel, size, speed })
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// All reference data a pipeline run reads.
#[derive(Clone, Debug, Default)]
pub struct ReferenceTables {
    pub coordinates: PortCoordinates,
    pub tariffs: PortTariffs,
    pub fuel_curve: FuelCurve,
}

impl ReferenceTables {
    pub fn new(
        locations: Vec<PortLocation>,
        tariffs: Vec<PortTariff>,
        fuel_curve: Vec<FuelCurveEntry>,
    ) -> Self {
        Self {
            coordinates: PortCoordinates::from_rows(locations),
            tariffs: PortTariffs::from_rows(tariffs),
            fuel_curve: FuelCurve::from_rows(fuel_curve),
        }
    }
}
