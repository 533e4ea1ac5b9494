//! Runs the full pipeline for one request and keeps every intermediate table.

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::{
    apply_fuel_model, collate_port_calls, expand_speeds, resolve_route, summarize_speeds,
    summary_table, total_costs, voyage_track, CostRow, FuelledVoyage, LonLat, PipelineError,
    PortCall, PortCode, ReferenceTables, RouteLeg, Scenario, SeaRouteOracle, SpeedLegRow,
    SummaryRow,
};

#[derive(Clone, Debug, Default)]
pub struct VoyageRequest {
    /// Ports in calling order; repeat the first port at the end to close the loop.
    pub ports: Vec<PortCode>,
    pub scenario: Scenario,
    /// Also fetch the sailing track for map rendering.
    pub include_track: bool,
}

impl VoyageRequest {
    pub fn new(ports: Vec<PortCode>, scenario: Scenario) -> Self {
        Self {
            ports,
            scenario,
            include_track: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VoyageReport {
    pub legs: Vec<RouteLeg>,
    pub port_calls: Vec<PortCall>,
    pub speed_rows: Vec<SpeedLegRow>,
    pub voyages: Vec<FuelledVoyage>,
    pub costs: Vec<CostRow>,
    pub summary: Vec<SummaryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Vec<LonLat>>,
}

impl VoyageReport {
    /// Summary row with the lowest slot cost.
    pub fn cheapest_slot(&self) -> Option<&SummaryRow> {
        self.summary
            .iter()
            .min_by(|a, b| a.slot_cost.total_cmp(&b.slot_cost))
    }
}

pub async fn run_voyage<O>(
    request: &VoyageRequest,
    reference: &ReferenceTables,
    oracle: &O,
) -> Result<VoyageReport, PipelineError>
where
    O: SeaRouteOracle + ?Sized,
{
    let span = tracing::info_span!("voyage", request_id = %Uuid::new_v4());
    run_stages(request, reference, oracle).instrument(span).await
}

async fn run_stages<O>(
    request: &VoyageRequest,
    reference: &ReferenceTables,
    oracle: &O,
) -> Result<VoyageReport, PipelineError>
where
    O: SeaRouteOracle + ?Sized,
{
    let Scenario {
        vessel,
        diesel_oil,
        fuel_oil,
        costs,
        tariff,
    } = &request.scenario;

    vessel.validate()?;
    if request.ports.len() < 2 {
        return Err(PipelineError::TooFewPorts(request.ports.len()));
    }
    tracing::info!(ports = ?request.ports, size = %vessel.size_class(), "Starting voyage run");

    let legs = resolve_route(&request.ports, &reference.coordinates, oracle).await?;
    let port_calls = collate_port_calls(&legs, &reference.tariffs, vessel, tariff)?;
    let speed_rows = expand_speeds(&port_calls, vessel);
    let summaries = summarize_speeds(&speed_rows);
    let voyages = apply_fuel_model(
        &summaries,
        &reference.fuel_curve,
        vessel,
        diesel_oil,
        fuel_oil,
    )?;
    let cost_rows = total_costs(&voyages, costs, vessel);
    let summary = summary_table(&cost_rows, vessel)?;

    let track = if request.include_track {
        Some(voyage_track(&legs, oracle).await?)
    } else {
        None
    };

    tracing::info!(
        legs = legs.len(),
        speeds = voyages.len(),
        scenarios = summary.len(),
        "Voyage run complete"
    );

    Ok(VoyageReport {
        legs,
        port_calls,
        speed_rows,
        voyages,
        costs: cost_rows,
        summary,
        track,
    })
}
