use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use slot_cost_calculator::{
    app::{run_voyage, VoyageReport, VoyageRequest},
    domain::{
        config::CAPACITY_TIERS, DieselOil, FuelOil, OracleError, PipelineError, Scenario,
        SeaRouteOracle,
    },
    infra::{
        loader::{default_data_dir, load_reference_tables, LoadError},
        searoute::{GreatCircleOracle, SearouteClient},
    },
    util::{
        persistence::{resolve_scenario, ScenarioLoadError},
        table::{cost_table, format_amount, port_call_table, speed_table},
        version::{version_label, APP_NAME},
    },
};

#[derive(Debug, Parser)]
#[command(name = "slot-cost", version, about = "Voyage and slot cost scenarios for container vessels")]
struct Cli {
    /// Ports in calling order, comma separated (e.g. CNSHA,SGSIN,NLRTM,CNSHA).
    #[arg(long, value_delimiter = ',', required_unless_present = "list_ports")]
    ports: Vec<String>,

    /// Print the port codes known to the tariff table and exit.
    #[arg(long)]
    list_ports: bool,

    /// Scenario JSON file; defaults to scenario.json in the config directory.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Directory holding the reference tables.
    #[arg(long, env = "SLOT_COST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Vessel capacity in TEU.
    #[arg(long, value_parser = parse_capacity)]
    capacity: Option<u32>,

    /// Share of 40 ft containers, 0-100.
    #[arg(long)]
    forty_feet_percent: Option<f64>,

    /// Sailing frequency in days.
    #[arg(long)]
    frequency: Option<f64>,

    /// ECA distance in miles.
    #[arg(long)]
    eca_distance: Option<f64>,

    /// Share of capacity filled with TEU, 0-100.
    #[arg(long)]
    teu_percent: Option<f64>,

    /// Slot market price.
    #[arg(long)]
    slot_price: Option<f64>,

    /// DO bunker price per tonne.
    #[arg(long)]
    do_price: Option<f64>,

    /// VLSFO bunker price per tonne.
    #[arg(long)]
    fo_price: Option<f64>,

    #[arg(long, value_enum, default_value_t = OracleKind::GreatCircle)]
    oracle: OracleKind,

    /// Base URL of the sea-routing service.
    #[arg(long, env = "SEAROUTE_URL")]
    searoute_url: Option<String>,

    /// Include the sailing track in JSON output.
    #[arg(long)]
    track: bool,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OracleKind {
    /// Offline great-circle distances.
    GreatCircle,
    /// HTTP sea-routing service.
    Searoute,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to read scenario: {0}")]
    Scenario(#[from] ScenarioLoadError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to set up routing: {0}")]
    Oracle(#[from] OracleError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_capacity(raw: &str) -> Result<u32, String> {
    let value: u32 = raw.parse().map_err(|err| format!("{err}"))?;
    if CAPACITY_TIERS.contains(&value) {
        Ok(value)
    } else {
        Err(format!("capacity must be one of {CAPACITY_TIERS:?}"))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let reference = load_reference_tables(Some(&data_dir))?;

    if cli.list_ports {
        for code in reference.tariffs.port_codes() {
            let name = reference
                .coordinates
                .get(&code)
                .and_then(|location| location.name.clone())
                .unwrap_or_default();
            println!("{code}  {name}");
        }
        return Ok(());
    }

    let scenario = apply_overrides(resolve_scenario(cli.scenario.as_deref())?, &cli);
    let oracle: Box<dyn SeaRouteOracle> = match cli.oracle {
        OracleKind::GreatCircle => Box::new(GreatCircleOracle::default()),
        OracleKind::Searoute => match cli.searoute_url.as_deref() {
            Some(url) => Box::new(SearouteClient::with_base_url(url)?),
            None => Box::new(SearouteClient::new()?),
        },
    };

    let request = VoyageRequest {
        ports: cli.ports.iter().map(|code| code.trim().to_uppercase()).collect(),
        scenario,
        include_track: cli.track,
    };
    let report = run_voyage(&request, &reference, oracle.as_ref()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn apply_overrides(mut scenario: Scenario, cli: &Cli) -> Scenario {
    let vessel = &mut scenario.vessel;
    if let Some(capacity) = cli.capacity {
        vessel.capacity = capacity;
    }
    if let Some(percent) = cli.forty_feet_percent {
        vessel.forty_feet_fraction = percent * 0.01;
    }
    if let Some(frequency) = cli.frequency {
        vessel.frequency = frequency;
    }
    if let Some(distance) = cli.eca_distance {
        vessel.eca_distance = distance;
    }
    if let Some(percent) = cli.teu_percent {
        vessel.teu_fraction = percent * 0.01;
    }
    if let Some(price) = cli.slot_price {
        vessel.slot_revenue = price;
    }
    if let Some(price) = cli.do_price {
        scenario.diesel_oil = DieselOil {
            bunker_price: price,
            ..scenario.diesel_oil
        };
    }
    if let Some(price) = cli.fo_price {
        scenario.fuel_oil = FuelOil {
            bunker_price: price,
            ..scenario.fuel_oil
        };
    }
    scenario
}

fn print_report(report: &VoyageReport) {
    println!("{APP_NAME} {}\n", version_label());
    println!("Port Information");
    println!("{}", port_call_table(&report.port_calls).render());
    println!("Distances (miles) and Times (days) for Varying Speeds");
    println!("{}", speed_table(&report.voyages).render());
    println!("Summary");
    println!("{}", cost_table(&report.summary).render());

    if let Some(best) = report.cheapest_slot() {
        println!(
            "Lowest slot cost: {:.2} at {} kn with charter hire {} (annual margin {})",
            best.slot_cost,
            best.cost.voyage.summary.speed,
            format_amount(best.cost.charter_hire),
            format_amount(best.annual_margin())
        );
    }
}
