//! Headless host for the Fallen Compass world map.
//!
//! Runs one planning-and-travel cycle outside the game client, exercising
//! the same calls the client makes.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `fallen-compass.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the expedition manager with file-backed save slots
//! 4. Initialize or restore the exploration state
//! 5. Start an expedition and select the available area
//! 6. Walk a convoy along the preview route, polling the autosave
//! 7. End the expedition and flush on shutdown (also on Ctrl-C)

mod convoy;
mod error;
mod log_listener;

use std::path::PathBuf;
use std::time::Duration;

use compass_core::config::CompassConfig;
use compass_core::debounce::SystemClock;
use compass_core::manager::ExpeditionManager;
use compass_core::persistence::FileSaveSlots;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::convoy::Convoy;
use crate::error::EngineError;
use crate::log_listener::LogListener;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "fallen-compass.yaml";

/// Time the convoy spends on each cell.
const CONVOY_STEP: Duration = Duration::from_millis(100);

/// How often the autosave is polled while idle.
const AUTOSAVE_POLL: Duration = Duration::from_millis(50);

/// Supplies allocated to the demo expedition.
const STARTING_SUPPLIES: u32 = 100;

/// Gold available to pay for the route.
const AVAILABLE_MONEY: u32 = 500;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or logging cannot
/// be installed.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .try_init()
        .map_err(|e| EngineError::Logging {
            message: e.to_string(),
        })?;

    info!(
        slot = config.persistence.slot,
        directory = %config.persistence.directory.display(),
        debounce_ms = config.persistence.autosave_debounce_ms,
        restore_on_startup = config.persistence.restore_on_startup,
        "compass-engine starting"
    );

    // 3. Build the manager.
    let saves = FileSaveSlots::new(&config.persistence.directory);
    let mut manager =
        ExpeditionManager::new(&config, Box::new(saves), Box::new(SystemClock::new()));
    manager.add_listener(Box::new(LogListener::new()));

    // 4. Initialize exploration.
    let state = manager.init_or_load();
    info!(?state, "Exploration ready");

    // 5. Plan.
    let _ = manager.start_new_expedition("Preview Expedition", STARTING_SUPPLIES);
    let area = config.world_map.available_start.area;
    if !manager.select_area(area) || !manager.plan().has_route() {
        warn!(%area, "No route to the preview target");
        manager.end_expedition(false);
        manager.shutdown();
        return Ok(());
    }

    let plan = manager.plan().clone();
    info!(
        cells = plan.path.len(),
        money = plan.cost.money,
        risk = plan.cost.risk,
        "Route planned"
    );
    if !manager.validate_plan(AVAILABLE_MONEY) {
        warn!(money = plan.cost.money, available = AVAILABLE_MONEY, "Route is too expensive");
        manager.end_expedition(false);
        manager.shutdown();
        return Ok(());
    }

    // 6. Travel.
    let convoy = Convoy::new(plan.path, *manager.bounds());
    let completed = walk(&mut manager, convoy).await;

    // 7. Finish.
    manager.end_expedition(completed);
    manager.shutdown();
    info!(
        revealed = manager.exploration().revealed_count(),
        "compass-engine shutdown complete"
    );
    Ok(())
}

/// Walk the convoy to the end of its route, then wait for the autosave.
///
/// Returns `false` if interrupted by Ctrl-C before the route finished.
async fn walk(manager: &mut ExpeditionManager, mut convoy: Convoy) -> bool {
    let mut step = tokio::time::interval(CONVOY_STEP);
    let mut poll = tokio::time::interval(AUTOSAVE_POLL);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = step.tick(), if convoy.remaining() > 0 => {
                if let Some((x, y)) = convoy.step() {
                    let _ = manager.record_visited_world_location(x, y);
                }
            }
            _ = poll.tick() => {
                let _ = manager.poll_autosave();
                if convoy.remaining() == 0 && !manager.autosave_pending() {
                    info!("Convoy arrived");
                    return true;
                }
            }
            _ = &mut shutdown => {
                warn!(remaining = convoy.remaining(), "Interrupted, flushing exploration");
                return false;
            }
        }
    }
}

/// Load configuration from the first argument or `fallen-compass.yaml`.
fn load_config() -> Result<CompassConfig, EngineError> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if path.exists() {
        Ok(CompassConfig::from_file(&path)?)
    } else {
        Ok(CompassConfig::parse("")?)
    }
}
