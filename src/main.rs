use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use orbitarium::elements::ElementStore;
use orbitarium::scene::{self, SphereMesh};
use orbitarium::sim::{self, ReferenceFrame, SkippedObject, TimeGrid};
use orbitarium::web::api::simulation::{default_start, SatelliteTrace, SimulationResponse};
use orbitarium::web::{self, Config};

#[derive(Parser)]
#[command(name = "orbitarium")]
#[command(about = "Animated 3D satellite orbit visualizer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Run the pipeline once and write the simulation JSON to a file
    Export {
        #[arg(long, default_value = "config.yaml")]
        config: String,
        #[arg(long)]
        output: String,
        /// Window start (RFC3339), overriding the configuration
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        duration_days: Option<i64>,
        #[arg(long)]
        step_minutes: Option<i64>,
        /// Coordinate frame: eci or ecef
        #[arg(long)]
        frame: Option<String>,
    },
    /// Validate configuration and element sets
    Validate {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Export {
            config,
            output,
            start,
            duration_days,
            step_minutes,
            frame,
        } => export(&config, &output, start, duration_days, step_minutes, frame),
        Commands::Validate { config } => validate(&config),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            None
        }
    }
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn export(
    path: &str,
    output: &str,
    start: Option<String>,
    duration_days: Option<i64>,
    step_minutes: Option<i64>,
    frame: Option<String>,
) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let start = match start {
        Some(s) => match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                eprintln!("Invalid start date: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };
    let frame = match frame.as_deref() {
        None => config.simulation.frame,
        Some("eci") => ReferenceFrame::Eci,
        Some("ecef") => ReferenceFrame::Ecef,
        Some(other) => {
            eprintln!("Unknown frame: {} (expected eci or ecef)", other);
            return ExitCode::FAILURE;
        }
    };

    let grid = match TimeGrid::build(
        start.or(config.simulation.start).unwrap_or_else(default_start),
        duration_days.unwrap_or(config.simulation.duration_days),
        step_minutes.unwrap_or(config.simulation.step_minutes),
    ) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut store = ElementStore::new(config.elements.tle_dir.clone(), config.elements.max_age);
    if let Err(e) = store.reload() {
        eprintln!("Element store error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut sets = Vec::with_capacity(config.satellites.len());
    let mut skipped = Vec::new();
    for sat in &config.satellites {
        match store.lookup(sat.catnr) {
            Ok(stored) => sets.push(stored.element_set(&sat.name)),
            Err(e) => {
                eprintln!("Warning: no element set for {}: {}", sat.name, e);
                skipped.push(SkippedObject {
                    name: sat.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    if sets.is_empty() {
        eprintln!("No element sets available for any configured satellite");
        return ExitCode::FAILURE;
    }

    let batch = sim::propagate(&sets, &grid, frame == ReferenceFrame::Ecef);
    let trail_samples = sim::trail_samples(config.simulation.trail, grid.step_minutes());
    let frames = match sim::assemble_frames(&batch, trail_samples, frame) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    skipped.extend(batch.skipped().iter().cloned());
    let frame_count = frames.len();

    let satellites: Vec<SatelliteTrace> = batch
        .objects()
        .iter()
        .enumerate()
        .map(|(slot, (name, _))| SatelliteTrace {
            name: name.clone(),
            symbol: scene::marker_symbol(slot).to_string(),
        })
        .collect();

    let response = SimulationResponse {
        start: grid.start(),
        step_minutes: grid.step_minutes(),
        frame,
        trail_samples,
        timestamps: grid.timestamps().to_vec(),
        earth: SphereMesh::earth(),
        satellites,
        frames,
        skipped,
    };

    let file = match File::create(output) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error creating {}: {}", output, e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = serde_json::to_writer(BufWriter::new(file), &response) {
        eprintln!("Error writing {}: {}", output, e);
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} frames for {} satellites to {}",
        frame_count,
        batch.objects().len(),
        output
    );
    ExitCode::SUCCESS
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    println!(
        "Configuration is valid ({} satellites)",
        config.satellites.len()
    );

    let mut store = ElementStore::new(config.elements.tle_dir.clone(), config.elements.max_age);
    if let Err(e) = store.reload() {
        eprintln!("Element store error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut unusable = 0;
    for sat in &config.satellites {
        match store.peek(sat.catnr) {
            Some(set) => match set.element_set(&sat.name).parse() {
                Ok(_) => {
                    let note = if store.is_stale(set) { " (stale)" } else { "" };
                    println!("  {} [{}]: ok{}", sat.name, sat.catnr, note);
                }
                Err(e) => {
                    println!("  {} [{}]: {}", sat.name, sat.catnr, e);
                    unusable += 1;
                }
            },
            None => {
                println!("  {} [{}]: no element set on file", sat.name, sat.catnr);
                unusable += 1;
            }
        }
    }

    if unusable > 0 {
        eprintln!(
            "{} of {} satellites have no usable element set",
            unusable,
            config.satellites.len()
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
