use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, Addr};
use anyhow::{Context, Result, bail};
use clap::Parser;
use park_chase_core::{
    driver::{LoadPositions, QueryStatus, SavePositions, Start, TogglePause},
    map::Viewport,
    prelude::*,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod control;
mod render;

use control::Command;
use render::LogSink;

#[derive(Parser, Debug)]
#[command(
    name = "park-chase",
    author,
    version,
    about = "Run a runner/chaser chase around a loop of waypoints",
    long_about = "Both actors start on the first waypoint. Each tick the chaser and then the \
                  runner advance by their step sizes; the chase ends when they land on the \
                  same waypoint.\n\n\
                  Commands are read from stdin, one per line: start, pause (toggles), save, \
                  load, status, quit."
)]
struct Args {
    /// JSON config file (runner_step, chaser_step, tick_interval_ms, storage_key)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON track (LineString, Polygon or MultiPoint); defaults to the Jingshan Park loop
    #[arg(short, long)]
    track: Option<PathBuf>,

    /// Directory for saved positions; positions are kept in memory when omitted
    #[arg(long)]
    store_dir: Option<PathBuf>,

    #[arg(long)]
    runner_step: Option<usize>,

    #[arg(long)]
    chaser_step: Option<usize>,

    /// Tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Map zoom level used to report marker pixel positions
    #[arg(long, default_value_t = 16.0)]
    zoom: f64,

    /// Map container size in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Start the chase immediately
    #[arg(long)]
    autostart: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ChaseConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ChaseConfig::from_json(&text)?
        }
        None => ChaseConfig::default(),
    };

    if let Some(step) = args.runner_step {
        config.runner_step = step;
    }
    if let Some(step) = args.chaser_step {
        config.chaser_step = step;
    }
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn load_track(args: &Args) -> Result<WaypointTrack> {
    let Some(path) = &args.track else {
        return Ok(WaypointTrack::jingshan_park());
    };

    if !path.exists() {
        bail!("Track file does not exist: {}", path.display());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read track {}", path.display()))?;
    Ok(WaypointTrack::from_geojson(&text)?)
}

async fn run_command(driver: &Addr<ChaseDriver>, command: Command) -> Result<()> {
    match command {
        Command::Start => {
            driver.send(Start).await?;
            println!("Chase started.");
        }
        Command::Pause => {
            let phase = driver.send(TogglePause).await?;
            println!("Chase is {phase}.");
        }
        Command::Save => match driver.send(SavePositions).await? {
            Ok(_) => println!("Positions saved."),
            Err(e) => println!("Failed to save positions: {e}"),
        },
        Command::Load => match driver.send(LoadPositions).await? {
            Ok(_) => println!("Positions loaded."),
            Err(ChaseError::NotFound(_)) => println!("No saved positions found."),
            Err(e) => println!("Failed to load positions: {e}"),
        },
        Command::Status => {
            let status = driver.send(QueryStatus).await?;
            println!(
                "{}: runner at waypoint {}, chaser at waypoint {}, {} ticks",
                status.phase, status.runner_index, status.chaser_index, status.ticks
            );
        }
        Command::Quit => {}
    }

    Ok(())
}

#[actix::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = load_config(&args).context("Invalid configuration")?;
    let track = load_track(&args).context("Failed to load track")?;

    let store: Arc<dyn KeyValueStore> = match &args.store_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "saving positions to disk");
            Arc::new(JsonFileStore::new(dir))
        }
        None => Arc::new(MemoryStore::new()),
    };

    let viewport = Viewport::new(track.center(), args.zoom, args.width, args.height);
    let driver = ChaseDriver::new(
        Arc::new(track),
        config,
        store,
        Box::new(LogSink::new(viewport)),
    )?
    .start();

    if args.autostart {
        run_command(&driver, Command::Start).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse_line(&line) {
            Ok(Some(Command::Quit)) => return Ok(()),
            Ok(Some(command)) => run_command(&driver, command).await?,
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }

    // Input closed without `quit`: let a running chase play out
    while driver.send(QueryStatus).await?.phase == Phase::Running {
        actix::clock::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}
