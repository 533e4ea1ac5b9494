//! Reads the reference tables and cleans them into the shapes the pipeline keys on.
//!
//! Tables are JSON arrays of records, one file per table. A table missing from the
//! data directory falls back to the sample embedded in the binary.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::domain::{
    FuelCurveEntry, LonLat, PortLocation, PortTariff, ReferenceTables, SizeClass,
};
use crate::util::assets;

pub const FUEL_CONSUMPTION_FILE: &str = "fuel_consumption.json";
pub const PORT_LOCATIONS_FILE: &str = "port_locations.json";
pub const PORT_INFORMATION_FILE: &str = "port_information.json";

const DATA_DIR_NAME: &str = "slot-cost-calculator";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} row {row} has no {field}")]
    MissingField {
        table: &'static str,
        row: usize,
        field: &'static str,
    },
    #[error("{table} row {row}: coordinate out of range")]
    InvalidCoordinate { table: &'static str, row: usize },
    #[error("no embedded copy of {0}")]
    MissingAsset(&'static str),
}

/// Default location of user-supplied reference tables.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// One row of the port information sheet before cleaning. Any cell may be blank.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PortInformationRecord {
    #[serde(default)]
    pub port_code: Option<String>,
    #[serde(default)]
    pub port_name: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub maneuver_time: Option<f64>,
    #[serde(default)]
    pub wait_time: Option<f64>,
    #[serde(default)]
    pub berth_time: Option<f64>,
    #[serde(default)]
    pub port_cost: Option<f64>,
}

impl PortInformationRecord {
    fn fill_from(&mut self, previous: &Self) {
        fill(&mut self.port_code, &previous.port_code);
        fill(&mut self.port_name, &previous.port_name);
        fill(&mut self.size, &previous.size);
        fill(&mut self.maneuver_time, &previous.maneuver_time);
        fill(&mut self.wait_time, &previous.wait_time);
        fill(&mut self.berth_time, &previous.berth_time);
        fill(&mut self.port_cost, &previous.port_cost);
    }

    fn row_key(&self) -> RowKey {
        let bits = |cell: Option<f64>| cell.map(f64::to_bits);
        (
            self.port_code.clone(),
            self.port_name.clone(),
            self.size,
            [
                bits(self.maneuver_time),
                bits(self.wait_time),
                bits(self.berth_time),
                bits(self.port_cost),
            ],
        )
    }
}

/// Cell-for-cell identity of a record. Numbers compare by bit pattern.
type RowKey = (
    Option<String>,
    Option<String>,
    Option<u32>,
    [Option<u64>; 4],
);

fn fill<T: Clone>(cell: &mut Option<T>, previous: &Option<T>) {
    if cell.is_none() {
        cell.clone_from(previous);
    }
}

#[derive(Debug, Deserialize)]
struct PortLocationRecord {
    port_code: String,
    #[serde(default)]
    port_name: Option<String>,
    latitude: f64,
    longitude: f64,
}

/// Fills every blank cell with the value above it.
pub fn forward_fill(mut records: Vec<PortInformationRecord>) -> Vec<PortInformationRecord> {
    for index in 1..records.len() {
        let (head, tail) = records.split_at_mut(index);
        tail[0].fill_from(&head[index - 1]);
    }
    records
}

/// Removes rows identical to an earlier row, keeping the first.
pub fn drop_duplicates(records: Vec<PortInformationRecord>) -> Vec<PortInformationRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.row_key()))
        .collect()
}

/// Forward-fill, de-duplicate, then require the key columns.
pub fn clean_port_information(
    records: Vec<PortInformationRecord>,
) -> Result<Vec<PortTariff>, LoadError> {
    drop_duplicates(forward_fill(records))
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let code = record.port_code.ok_or(LoadError::MissingField {
                table: PORT_INFORMATION_FILE,
                row,
                field: "port_code",
            })?;
            let size = record.size.ok_or(LoadError::MissingField {
                table: PORT_INFORMATION_FILE,
                row,
                field: "size",
            })?;
            Ok(PortTariff {
                code,
                name: record.port_name,
                size: SizeClass(size),
                maneuver_time: record.maneuver_time,
                wait_time: record.wait_time,
                berth_time: record.berth_time,
                port_cost: record.port_cost,
            })
        })
        .collect()
}

pub fn parse_port_information(json: &str) -> Result<Vec<PortTariff>, LoadError> {
    clean_port_information(parse_rows(PORT_INFORMATION_FILE, json)?)
}

pub fn parse_port_locations(json: &str) -> Result<Vec<PortLocation>, LoadError> {
    parse_rows::<PortLocationRecord>(PORT_LOCATIONS_FILE, json)?
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let position = LonLat::new(record.longitude, record.latitude);
            if !position.is_valid() {
                return Err(LoadError::InvalidCoordinate {
                    table: PORT_LOCATIONS_FILE,
                    row,
                });
            }
            Ok(PortLocation {
                code: record.port_code,
                name: record.port_name,
                position,
            })
        })
        .collect()
}

pub fn parse_fuel_consumption(json: &str) -> Result<Vec<FuelCurveEntry>, LoadError> {
    parse_rows(FUEL_CONSUMPTION_FILE, json)
}

fn parse_rows<T: DeserializeOwned>(table: &'static str, json: &str) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(json).map_err(|source| LoadError::Parse { table, source })
}

/// Loads all three tables from `dir`, using embedded samples for any absent file.
pub fn load_reference_tables(dir: Option<&Path>) -> Result<ReferenceTables, LoadError> {
    let fuel = parse_fuel_consumption(&read_table(dir, FUEL_CONSUMPTION_FILE)?)?;
    let locations = parse_port_locations(&read_table(dir, PORT_LOCATIONS_FILE)?)?;
    let tariffs = parse_port_information(&read_table(dir, PORT_INFORMATION_FILE)?)?;

    tracing::info!(
        fuel_rows = fuel.len(),
        locations = locations.len(),
        tariff_rows = tariffs.len(),
        "Reference tables loaded"
    );
    Ok(ReferenceTables::new(locations, tariffs, fuel))
}

fn read_table(dir: Option<&Path>, name: &'static str) -> Result<String, LoadError> {
    if let Some(dir) = dir {
        let path = dir.join(name);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Reading reference table");
            return fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source });
        }
        tracing::debug!(path = %path.display(), "Table not found; using embedded sample");
    }
    assets::reference_table(name).ok_or(LoadError::MissingAsset(name))
}
