//! Voyage cost pipeline: route, tariffs, speeds, fuel, charter hire, summary.

pub mod config;
pub mod cost;
pub mod entities;
pub mod error;
pub mod fuel;
pub mod reference;
pub mod route;
pub mod speed;
pub mod summary;
pub mod tariff;

pub use config::{
    DieselOil, FixedCosts, FuelOil, MissingPortCost, Scenario, TariffPolicy, VesselConfig,
};
pub use cost::{total_costs, CostRow};
pub use entities::{
    FuelCurveEntry, FuelType, Knots, LonLat, PortCode, PortLocation, PortTariff, SizeClass,
};
pub use error::{OracleError, PipelineError};
pub use fuel::{apply_fuel_model, bunker_cost, port_fuel, sea_fuel, BunkerCost, FuelledVoyage};
pub use reference::{FuelCurve, PortCoordinates, PortTariffs, ReferenceTables};
pub use route::{resolve_route, voyage_track, DistanceUnits, RouteLeg, SeaRouteOracle};
pub use speed::{calculate_totals, expand_speeds, summarize_speeds, SpeedLegRow, SpeedSummary};
pub use summary::{summarize_row, summary_table, SummaryRow};
pub use tariff::{collate_port_calls, PortCall};
