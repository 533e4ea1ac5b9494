//! Port distance resolution and the routing seam.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entities::{LonLat, PortCode};
use super::error::{OracleError, PipelineError};
use super::reference::PortCoordinates;

/// Units a routing oracle can report lengths in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnits {
    /// Statute miles, the unit every downstream formula expects.
    #[default]
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "nm")]
    NauticalMiles,
    #[serde(rename = "km")]
    Kilometers,
}

impl DistanceUnits {
    pub fn code(&self) -> &'static str {
        match self {
            DistanceUnits::Miles => "mi",
            DistanceUnits::NauticalMiles => "nm",
            DistanceUnits::Kilometers => "km",
        }
    }

    /// Mean Earth radius in these units.
    pub fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnits::Miles => 3958.7613,
            DistanceUnits::NauticalMiles => 3440.0695,
            DistanceUnits::Kilometers => 6371.0088,
        }
    }
}

impl fmt::Display for DistanceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sea-routing service: shortest navigable path between two points.
#[async_trait]
pub trait SeaRouteOracle: Send + Sync {
    /// Sailing distance between two points in `units`.
    async fn distance(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<f64, OracleError>;

    /// Ordered waypoints of the sailing path, endpoints included.
    async fn route(&self, origin: LonLat, destination: LonLat) -> Result<Vec<LonLat>, OracleError>;
}

/// One row of the route table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// `None` only on the synthetic arrival row.
    pub origin: Option<PortCode>,
    pub origin_position: Option<LonLat>,
    pub destination: PortCode,
    pub destination_position: LonLat,
    /// Sea distance in miles.
    pub distance: f64,
}

impl RouteLeg {
    /// The leading row that marks arrival at the first port.
    pub fn is_arrival(&self) -> bool {
        self.origin.is_none()
    }
}

/// Builds the route table for `ports`: one synthetic arrival row, then one row per
/// consecutive pair with its sea distance in miles.
pub async fn resolve_route<O>(
    ports: &[PortCode],
    coordinates: &PortCoordinates,
    oracle: &O,
) -> Result<Vec<RouteLeg>, PipelineError>
where
    O: SeaRouteOracle + ?Sized,
{
    let Some(first) = ports.first() else {
        return Err(PipelineError::EmptyRoute);
    };

    let mut legs = Vec::with_capacity(ports.len());
    legs.push(RouteLeg {
        origin: None,
        origin_position: None,
        destination: first.clone(),
        destination_position: coordinates.position(first)?,
        distance: 0.0,
    });

    for pair in ports.windows(2) {
        let (origin, destination) = (&pair[0], &pair[1]);
        let origin_position = coordinates.position(origin)?;
        let destination_position = coordinates.position(destination)?;
        let distance = oracle
            .distance(origin_position, destination_position, DistanceUnits::Miles)
            .await?;
        tracing::debug!(%origin, %destination, distance, "Resolved sea leg");
        legs.push(RouteLeg {
            origin: Some(origin.clone()),
            origin_position: Some(origin_position),
            destination: destination.clone(),
            destination_position,
            distance,
        });
    }

    tracing::debug!(legs = legs.len(), "Route table built");
    Ok(legs)
}

/// Concatenated sailing track for every computed leg, for map rendering.
pub async fn voyage_track<O>(legs: &[RouteLeg], oracle: &O) -> Result<Vec<LonLat>, PipelineError>
where
    O: SeaRouteOracle + ?Sized,
{
    let mut track = Vec::new();
    for leg in legs {
        let Some(origin) = leg.origin_position else {
            continue;
        };
        let mut waypoints = oracle.route(origin, leg.destination_position).await?;
        // Each leg starts where the previous one ended.
        if !waypoints.is_empty() && track.last() == waypoints.first() {
            waypoints.remove(0);
        }
        track.extend(waypoints);
    }
    Ok(track)
}
