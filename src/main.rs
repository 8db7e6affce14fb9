//! Drishti - calibration run against a mock scene
//!
//! Loads a YAML scene, serves it from a mock simulation host on its own
//! thread and runs the full calibration flow over the request/response
//! handoff, then writes the report as JSON.
//!
//! Usage:
//!   drishti --scene scenes/studio.yaml
//!   drishti --scene scenes/studio.yaml --config drishti.toml --seed 7
//!
//! More detail:
//!   RUST_LOG=drishti=debug drishti --scene scenes/studio.yaml

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use drishti::protocol::handoff;
use drishti::sim::{MockHost, MockScene};
use drishti::{CalibrationSession, DrishtiConfig, Result};

/// Grid discovery and receptacle visibility calibration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene description (YAML)
    #[arg(short, long)]
    scene: PathBuf,

    /// Configuration file; drishti.toml is used when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report path, overriding the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed (0 = random each run), overriding the configured one
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("drishti=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("Calibration failed [{}]: {}", e.code(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<DrishtiConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            DrishtiConfig::load(path)
        }
        None if Path::new("drishti.toml").exists() => {
            info!("Loading configuration from drishti.toml");
            DrishtiConfig::load(Path::new("drishti.toml"))
        }
        None => {
            info!("Using default configuration");
            Ok(DrishtiConfig::default())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or(config.scene.random_seed);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.report_path));

    let scene = MockScene::load(&args.scene)?;
    let scene_name = scene.name.clone();
    info!("Drishti v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Scene {}: {}x{} cells, {} objects, seed {}",
        scene_name,
        scene.floor.cols,
        scene.floor.rows,
        scene.objects.len(),
        seed
    );

    let (client, endpoint) = handoff();
    let server = endpoint.spawn(MockHost::new(scene))?;

    let mut session = CalibrationSession::new(client, config, seed);
    let outcome = session.calibrate(&scene_name);

    // Dropping the client closes the request channel and stops the host thread
    drop(session);
    match server.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Simulation host stopped with error: {}", e),
        Err(_) => warn!("Simulation host thread panicked"),
    }

    let report = outcome?;
    if report.has_islands {
        warn!("Grid still has islands after pruning");
    }
    report.write_json(&output)?;
    info!(
        "Wrote {} pivot records for {} grid points to {:?}",
        report.pivot_records.len(),
        report.grid_points.len(),
        output
    );

    if report.pivot_records.is_empty() {
        warn!("No receptacle pivot was visible from any grid point");
    }
    Ok(())
}
