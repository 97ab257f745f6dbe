//! World-map listener that reports changes through `tracing`.
//!
//! Stands in for the fog and route views of the game. Cell changes are
//! logged at debug level; saves and expedition changes at info.

use compass_core::events::{WorldMapEvent, WorldMapListener};
use tracing::{debug, info};

/// Listener that logs every world-map event.
#[derive(Debug, Default)]
pub struct LogListener {
    revealed: u64,
}

impl LogListener {
    /// Create a listener with no cells counted.
    pub const fn new() -> Self {
        Self { revealed: 0 }
    }
}

impl WorldMapListener for LogListener {
    fn on_event(&mut self, event: &WorldMapEvent) {
        match event {
            WorldMapEvent::CellRevealed { cell } => {
                self.revealed = self.revealed.saturating_add(1);
                debug!(%cell, total = self.revealed, "Fog lifted");
            }
            WorldMapEvent::CellHidden { cell } => {
                debug!(%cell, "Fog restored");
            }
            WorldMapEvent::ExplorationSaved { slot } => {
                info!(slot, revealed_this_session = self.revealed, "Exploration saved");
            }
            WorldMapEvent::ExpeditionStateChanged { id, status } => {
                info!(%id, ?status, "Expedition state changed");
            }
        }
    }
}
