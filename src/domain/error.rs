use thiserror::Error;

use super::entities::{FuelType, Knots, PortCode, SizeClass};

/// Fatal failures of a pipeline run. Each one aborts the request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("route needs at least one port")]
    EmptyRoute,
    #[error("a voyage needs at least two ports, got {0}")]
    TooFewPorts(usize),
    #[error("port {0} is missing from the port location table")]
    UnknownPort(PortCode),
    #[error("no {fuel} consumption for {size} at {speed} knots")]
    MissingFuelCurve {
        fuel: FuelType,
        size: SizeClass,
        speed: Knots,
    },
    #[error("port {0} has no handling cost for the selected size class")]
    MissingPortCost(PortCode),
    #[error("voyage at {speed} knots has zero total time")]
    ZeroVoyageTime { speed: Knots },
    #[error("vessel has no sellable slots (capacity x TEU fraction is zero)")]
    NoSellableSlots,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("routing failed: {0}")]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service error: {0}")]
    Api(String),
    #[error("coordinate out of range: {0}")]
    InvalidCoordinate(String),
}
