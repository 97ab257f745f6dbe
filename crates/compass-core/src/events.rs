//! Change notifications for fog, route, and expedition views.
//!
//! The manager reports state changes through [`WorldMapListener`]s. A
//! listener is only told about changes that actually happened: a reveal
//! of an already revealed cell produces no event, and neither does hiding
//! a cell that is still in fog.

use std::sync::{Arc, Mutex};

use compass_types::{ExpeditionId, ExpeditionStatus, GlobalId};

/// Something observable changed in the world-map state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldMapEvent {
    /// A cell went from hidden to revealed.
    CellRevealed {
        /// The newly revealed cell.
        cell: GlobalId,
    },

    /// A revealed cell was hidden again.
    CellHidden {
        /// The cell returned to fog.
        cell: GlobalId,
    },

    /// Both masks were written to the save slot.
    ExplorationSaved {
        /// The slot written.
        slot: String,
    },

    /// An expedition started or finished.
    ExpeditionStateChanged {
        /// The expedition.
        id: ExpeditionId,
        /// Its status after the change.
        status: ExpeditionStatus,
    },
}

/// Receiver of [`WorldMapEvent`]s.
pub trait WorldMapListener: Send {
    /// Called after the change has been applied.
    fn on_event(&mut self, event: &WorldMapEvent);
}

/// A listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl WorldMapListener for NoOpListener {
    fn on_event(&mut self, _event: &WorldMapEvent) {}
}

/// A listener that keeps every event it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<WorldMapEvent>>>,
}

impl RecordingListener {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far. Clones share one log.
    pub fn events(&self) -> Vec<WorldMapEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl WorldMapListener for RecordingListener {
    fn on_event(&mut self, event: &WorldMapEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
