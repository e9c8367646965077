use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use sat_o_range::config::Config;
use sat_o_range::fleet::{EntityKind, EntitySummary, Simulation};
use sat_o_range::range::PositionSource;
use sat_o_range::web::{self, state::resolve_time};

#[derive(Parser)]
#[command(name = "sat-o-range")]
#[command(about = "Satellite and ship range classification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and report what it loads
    Validate { config: String },
    /// Print the position of a satellite
    Position {
        config: String,
        satellite: String,
        /// RFC3339 time, defaults to the start of the data
        #[arg(long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Print one revolution of a satellite's ground track
    Trace {
        config: String,
        satellite: String,
        #[arg(long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
    },
    /// List the entities in range of a ship or a satellite
    InRange {
        config: String,
        #[arg(long, conflicts_with = "satellite", required_unless_present = "satellite")]
        ship: Option<String>,
        #[arg(long)]
        satellite: Option<String>,
        #[arg(long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve { config: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Position {
            config,
            satellite,
            time,
            json,
        } => position(&config, &satellite, time, json),
        Commands::Trace {
            config,
            satellite,
            time,
        } => trace(&config, &satellite, time),
        Commands::InRange {
            config,
            ship,
            satellite,
            time,
            json,
        } => in_range(&config, ship, satellite, time, json),
        Commands::Serve { config } => serve(&config),
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC3339 time '{}': {}", s, e))
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn load_simulation(path: &str) -> Option<Simulation> {
    let config = load_config(path)?;
    match Simulation::load(&config) {
        Ok(sim) => Some(sim),
        Err(e) => {
            eprintln!("Load error: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(sim) = load_simulation(path) else {
        return ExitCode::FAILURE;
    };

    println!(
        "Config is valid ({} satellites, {} ships)",
        sim.satellites().len(),
        sim.ships().len()
    );
    for satellite in sim.satellites() {
        let history = satellite.history();
        match history.span() {
            Some((start, end)) => println!(
                "  satellite {} {}: {} records, {} .. {}",
                satellite.id(),
                satellite.name(),
                history.records().len(),
                start,
                end
            ),
            None => println!(
                "  satellite {} {}: {} records, never available",
                satellite.id(),
                satellite.name(),
                history.records().len()
            ),
        }
    }
    for ship in sim.ships() {
        let (start, end) = ship.span();
        println!(
            "  ship {} {}: {} points, {} .. {}",
            ship.id(),
            ship.name(),
            ship.track().len(),
            start,
            end
        );
    }
    ExitCode::SUCCESS
}

fn position(path: &str, id: &str, time: Option<DateTime<Utc>>, json: bool) -> ExitCode {
    let Some(sim) = load_simulation(path) else {
        return ExitCode::FAILURE;
    };
    let Some(satellite) = sim.satellite(id) else {
        eprintln!("Unknown satellite: {}", id);
        return ExitCode::FAILURE;
    };
    let time = resolve_time(time, &sim);

    let position = match satellite.position_at(time) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Propagation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        return print_json(&position);
    }
    match position {
        Some(p) => println!(
            "{} at {}: lon {:.4}°, lat {:.4}°, height {:.1} km",
            satellite.name(),
            time,
            p.longitude_deg(),
            p.latitude_deg(),
            p.height / 1000.0
        ),
        None => println!("{} has no element set active at {}", satellite.name(), time),
    }
    ExitCode::SUCCESS
}

fn trace(path: &str, id: &str, time: Option<DateTime<Utc>>) -> ExitCode {
    let Some(mut sim) = load_simulation(path) else {
        return ExitCode::FAILURE;
    };
    let time = resolve_time(time, &sim);
    let Some(satellite) = sim.satellite_mut(id) else {
        eprintln!("Unknown satellite: {}", id);
        return ExitCode::FAILURE;
    };

    match satellite.orbit_trace(time) {
        Ok(points) => {
            for (minute, p) in points.iter().enumerate() {
                println!(
                    "{:>4} {:>10.4} {:>9.4} {:>9.1}",
                    minute,
                    p.longitude_deg(),
                    p.latitude_deg(),
                    p.height / 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Propagation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn in_range(
    path: &str,
    ship: Option<String>,
    satellite: Option<String>,
    time: Option<DateTime<Utc>>,
    json: bool,
) -> ExitCode {
    let Some(sim) = load_simulation(path) else {
        return ExitCode::FAILURE;
    };
    let time = resolve_time(time, &sim);

    let found: Option<Vec<EntitySummary>> = match (ship, satellite) {
        (Some(id), _) => sim.satellites_in_range_of_ship(&id, time).map(|sats| {
            sats.into_iter()
                .map(|s| EntitySummary::of(EntityKind::Satellite, s))
                .collect()
        }),
        (None, Some(id)) => sim.ships_in_range_of_satellite(&id, time).map(|ships| {
            ships
                .into_iter()
                .map(|s| EntitySummary::of(EntityKind::Ship, s))
                .collect()
        }),
        (None, None) => None,
    };

    let Some(found) = found else {
        eprintln!("Unknown entity");
        return ExitCode::FAILURE;
    };

    if json {
        return print_json(&found);
    }
    println!(
        "{} in range at {} (threshold {} km)",
        found.len(),
        time,
        sim.classifier().threshold_km()
    );
    for entity in &found {
        println!("  {} {} {}", entity.kind, entity.id, entity.name);
    }
    ExitCode::SUCCESS
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
