//! Joins the route table with port-call tariffs for the vessel's size class.

use serde::{Deserialize, Serialize};

use super::config::{MissingPortCost, TariffPolicy, VesselConfig};
use super::entities::PortCode;
use super::error::PipelineError;
use super::reference::PortTariffs;
use super::route::RouteLeg;

/// Route leg with the destination's port-call times (hours) and cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortCall {
    pub port_code: PortCode,
    /// Whether the tariff table had a row for this port and size class.
    pub matched: bool,
    pub maneuver_time: f64,
    pub wait_time: f64,
    pub berth_time: f64,
    /// `None` when the tariff table has no handling cost for the port.
    pub port_cost: Option<f64>,
    pub distance: f64,
}

impl PortCall {
    pub fn port_time(&self) -> f64 {
        self.maneuver_time + self.wait_time + self.berth_time
    }
}

/// Left-joins `legs` on destination against `tariffs` for the configured size class.
///
/// The final row is the return to origin and is never charged.
pub fn collate_port_calls(
    legs: &[RouteLeg],
    tariffs: &PortTariffs,
    config: &VesselConfig,
    policy: &TariffPolicy,
) -> Result<Vec<PortCall>, PipelineError> {
    let size = config.size_class();
    let last = legs.len().saturating_sub(1);
    let mut calls = Vec::with_capacity(legs.len());

    for (index, leg) in legs.iter().enumerate() {
        let tariff = tariffs.get(&leg.destination, size);

        if index == last {
            calls.push(PortCall {
                port_code: leg.destination.clone(),
                matched: tariff.is_some(),
                maneuver_time: 0.0,
                wait_time: 0.0,
                berth_time: 0.0,
                port_cost: Some(0.0),
                distance: leg.distance,
            });
            continue;
        }

        if tariff.is_none() {
            tracing::warn!(
                port = %leg.destination,
                %size,
                "No tariff row; using default port times"
            );
        }

        let port_cost = tariff.and_then(|t| t.port_cost);
        if port_cost.is_none() {
            match policy.missing_port_cost {
                MissingPortCost::Zero => {
                    tracing::warn!(port = %leg.destination, %size, "Handling cost unresolved")
                }
                MissingPortCost::Reject => {
                    return Err(PipelineError::MissingPortCost(leg.destination.clone()))
                }
            }
        }

        calls.push(PortCall {
            port_code: leg.destination.clone(),
            matched: tariff.is_some(),
            maneuver_time: tariff
                .and_then(|t| t.maneuver_time)
                .unwrap_or(config.maneuver_time),
            wait_time: tariff.and_then(|t| t.wait_time).unwrap_or(config.wait_time),
            berth_time: tariff.and_then(|t| t.berth_time).unwrap_or(config.berth_time),
            port_cost,
            distance: leg.distance,
        });
    }

    tracing::debug!(rows = calls.len(), "Port call table built");
    Ok(calls)
}
