//! The expedition manager: owner of the world-map state for a session.
//!
//! [`ExpeditionManager`] ties the pieces together:
//!
//! - the [`WorldMapExploration`] grid,
//! - route planning through a [`RoutePlanner`],
//! - the current [`Expedition`] and its lifecycle,
//! - debounced persistence of both masks into a [`SaveSlots`] backend,
//! - change notifications to registered [`WorldMapListener`]s.
//!
//! The manager is single-threaded and never blocks on timers. The host
//! loop drives it by calling [`poll_autosave`](ExpeditionManager::poll_autosave)
//! regularly and [`shutdown`](ExpeditionManager::shutdown) once at exit.

use std::path::PathBuf;

use compass_types::{
    AreaId, AreaSub, Expedition, ExpeditionStatus, ExplorationSave, GlobalId, RoutePlan,
    WorldBounds,
};
use compass_world::{WorldMapExploration, load_land_mask};
use tracing::{debug, info, warn};

use crate::config::CompassConfig;
use crate::debounce::{Debouncer, MonotonicClock};
use crate::events::{WorldMapEvent, WorldMapListener};
use crate::persistence::{PersistenceError, SaveSlots};
use crate::placement::world_to_global;
use crate::planning::RoutePlanner;

/// How [`ExpeditionManager::init_or_load`] set up the exploration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    /// Default areas revealed on a fresh map.
    Fresh,
    /// Reveal state restored from the save slot.
    Restored,
}

/// Orchestrates planning, exploration, and persistence for one session.
pub struct ExpeditionManager {
    exploration: WorldMapExploration,
    planner: RoutePlanner,
    /// Plan used while no expedition is active.
    planning_plan: RoutePlan,
    current: Option<Expedition>,

    bounds: WorldBounds,
    default_revealed_areas: Vec<i32>,
    land_mask_path: Option<PathBuf>,

    slot: String,
    restore_on_startup: bool,
    autosave: Debouncer,
    dirty: bool,

    clock: Box<dyn MonotonicClock>,
    saves: Box<dyn SaveSlots>,
    listeners: Vec<Box<dyn WorldMapListener>>,
}

impl std::fmt::Debug for ExpeditionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpeditionManager")
            .field("planner", &self.planner)
            .field("current", &self.current.as_ref().map(|e| e.id))
            .field("revealed", &self.exploration.revealed_count())
            .field("slot", &self.slot)
            .field("dirty", &self.dirty)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ExpeditionManager {
    /// Build a manager from configuration.
    ///
    /// The exploration grid starts fully hidden and all land; call
    /// [`init_or_load`](Self::init_or_load) before use.
    pub fn new(
        config: &CompassConfig,
        saves: Box<dyn SaveSlots>,
        clock: Box<dyn MonotonicClock>,
    ) -> Self {
        Self {
            exploration: WorldMapExploration::new(),
            planner: RoutePlanner::from_config(&config.world_map),
            planning_plan: RoutePlan::new(),
            current: None,
            bounds: config.world_map.bounds,
            default_revealed_areas: config.world_map.default_revealed_areas.clone(),
            land_mask_path: config.world_map.land_mask_path.clone(),
            slot: config.persistence.slot.clone(),
            restore_on_startup: config.persistence.restore_on_startup,
            autosave: Debouncer::new(config.persistence.autosave_debounce_ms),
            dirty: false,
            clock,
            saves,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for [`WorldMapEvent`]s.
    pub fn add_listener(&mut self, listener: Box<dyn WorldMapListener>) {
        self.listeners.push(listener);
    }

    fn emit(&mut self, event: &WorldMapEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    // -------------------------------------------------------------------
    // Startup and shutdown
    // -------------------------------------------------------------------

    /// Initialize the exploration state for a session.
    ///
    /// The land mask comes from the configured terrain image (all land if
    /// none is configured or it cannot be read). Unless restoring is
    /// enabled, the default areas are then revealed on a fresh map.
    ///
    /// With `restore_on_startup`, the saved masks are loaded instead. Each
    /// mask is restored only if it has the right length; when the reveal
    /// mask cannot be restored the default areas are revealed as for a
    /// fresh map.
    pub fn init_or_load(&mut self) -> StartupState {
        self.exploration = WorldMapExploration::new();
        self.autosave.cancel();
        self.dirty = false;
        self.load_land_mask_if_available();

        let state = if self.restore_on_startup && self.restore_from_slot() {
            StartupState::Restored
        } else {
            let _ = self
                .exploration
                .apply_default_revealed_areas(&self.default_revealed_areas);
            StartupState::Fresh
        };

        info!(
            ?state,
            revealed = self.exploration.revealed_count(),
            "World map initialized"
        );
        state
    }

    fn load_land_mask_if_available(&mut self) {
        let Some(path) = self.land_mask_path.as_deref() else {
            debug!("No terrain image configured, using all-land mask");
            return;
        };
        match load_land_mask(path) {
            Ok(mask) => {
                let _ = self.exploration.set_land_mask(&mask);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Terrain image unavailable"),
        }
    }

    /// Returns `true` if the reveal mask was restored.
    fn restore_from_slot(&mut self) -> bool {
        let save = match self.saves.load(&self.slot) {
            Ok(save) => save,
            Err(PersistenceError::SlotNotFound(_)) => {
                info!(slot = %self.slot, "No saved exploration, starting fresh");
                return false;
            }
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "Failed to load exploration, starting fresh");
                return false;
            }
        };

        let _ = self.exploration.set_land_mask(&save.land_mask);
        let restored = self.exploration.set_reveal_mask(&save.reveal_mask);
        if restored {
            info!(slot = %self.slot, "Exploration restored");
        }
        restored
    }

    /// Flush pending exploration changes and release the session.
    ///
    /// A dirty state is saved immediately, bypassing the debounce.
    pub fn shutdown(&mut self) {
        if let Some(expedition) = &self.current {
            warn!(name = %expedition.name, "Shutting down with an active expedition");
        }
        self.autosave.cancel();
        if self.dirty {
            if let Err(e) = self.save_now() {
                warn!(slot = %self.slot, error = %e, "Shutdown save failed");
            }
        }
        info!("Expedition manager shut down");
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Mark the exploration dirty and restart the autosave quiet period.
    pub fn start_autosave_debounced(&mut self) {
        self.dirty = true;
        self.autosave.request(self.clock.now_ms());
        debug!(deadline_ms = ?self.autosave.deadline(), "Autosave scheduled");
    }

    /// Run the autosave if its quiet period has elapsed.
    ///
    /// Returns `true` if a save was written. A failed save is logged and
    /// not retried; the state stays dirty for the shutdown flush.
    pub fn poll_autosave(&mut self) -> bool {
        if !self.autosave.poll(self.clock.now_ms()) {
            return false;
        }
        match self.save_now() {
            Ok(()) => true,
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "Autosave failed");
                false
            }
        }
    }

    /// Write both masks to the save slot now.
    ///
    /// Clears the dirty flag on success.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backend rejects the write.
    pub fn save_now(&mut self) -> Result<(), PersistenceError> {
        let record: ExplorationSave = self.exploration.snapshot();
        self.saves.save(&self.slot, &record)?;
        self.dirty = false;
        info!(
            slot = %self.slot,
            revealed = self.exploration.revealed_count(),
            "Exploration saved"
        );
        let event = WorldMapEvent::ExplorationSaved {
            slot: self.slot.clone(),
        };
        self.emit(&event);
        Ok(())
    }

    /// Whether reveal changes are waiting to be saved.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether an autosave is scheduled.
    pub const fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    // -------------------------------------------------------------------
    // Reveal
    // -------------------------------------------------------------------

    /// Set a cell's reveal state.
    ///
    /// Only an actual change schedules an autosave and notifies
    /// listeners. Returns whether the cell changed.
    pub fn set_revealed(&mut self, id: impl TryInto<GlobalId>, revealed: bool) -> bool {
        let Ok(cell) = id.try_into() else {
            return false;
        };
        if !self.exploration.set_revealed(cell, revealed) {
            return false;
        }
        self.start_autosave_debounced();
        let event = if revealed {
            WorldMapEvent::CellRevealed { cell }
        } else {
            WorldMapEvent::CellHidden { cell }
        };
        self.emit(&event);
        true
    }

    /// Reveal the cell under a world-space position.
    ///
    /// Called as the convoy moves. Returns whether a new cell was revealed.
    /// A non-finite position, or bounds with an empty axis, changes nothing.
    pub fn record_visited_world_location(&mut self, x: f64, y: f64) -> bool {
        let Some(cell) = world_to_global(&self.bounds, x, y) else {
            debug!(x, y, "Ignored position outside the grid mapping");
            return false;
        };
        let changed = self.set_revealed(cell, true);
        if changed {
            debug!(%cell, x, y, "Revealed visited cell");
        }
        changed
    }

    // -------------------------------------------------------------------
    // Planning
    // -------------------------------------------------------------------

    /// The plan currently being edited: the active expedition's, or the
    /// standalone planning plan when no expedition exists.
    pub fn plan(&self) -> &RoutePlan {
        self.current
            .as_ref()
            .map_or(&self.planning_plan, |expedition| &expedition.plan)
    }

    fn plan_and_map(&mut self) -> (&mut RoutePlan, &WorldMapExploration) {
        let plan = match self.current.as_mut() {
            Some(expedition) => &mut expedition.plan,
            None => &mut self.planning_plan,
        };
        (plan, &self.exploration)
    }

    /// Select an area on the planning map and build its preview route.
    ///
    /// See [`RoutePlanner::select_area`].
    pub fn select_area(&mut self, area: impl TryInto<AreaId>) -> bool {
        let planner = self.planner;
        let (plan, map) = self.plan_and_map();
        planner.select_area(plan, map, area)
    }

    /// Rebuild the preview route for the current plan.
    pub fn build_preview_route(&mut self) -> bool {
        let planner = self.planner;
        let (plan, map) = self.plan_and_map();
        planner.build_preview_route(plan, map)
    }

    /// Drop the preview route and its cost.
    pub fn clear_preview_route(&mut self) {
        let (plan, _) = self.plan_and_map();
        RoutePlanner::clear_preview_route(plan);
    }

    /// Whether the current plan has a route the player can pay for.
    ///
    /// An empty route is never affordable.
    pub fn validate_plan(&self, available_money: u32) -> bool {
        let plan = self.plan();
        let valid = plan.is_affordable(available_money);
        debug!(
            valid,
            money = plan.cost.money,
            available_money,
            cells = plan.path.len(),
            "Plan validated"
        );
        valid
    }

    /// Replace the selectable area and the start cell it grants.
    pub fn set_available_start(&mut self, start: AreaSub) {
        self.planner.available_start = start;
    }

    /// Replace the preview route destination.
    pub fn set_preview_target(&mut self, target: AreaSub) {
        self.planner.preview_target = target;
    }

    /// The planning anchors.
    pub const fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    // -------------------------------------------------------------------
    // Expedition lifecycle
    // -------------------------------------------------------------------

    /// Start a new expedition.
    ///
    /// An expedition still in the manager is ended as failed first. The
    /// new expedition starts in progress with an empty plan.
    pub fn start_new_expedition(&mut self, name: &str, starting_supplies: u32) -> &Expedition {
        if let Some(previous) = &self.current {
            warn!(name = %previous.name, "Starting an expedition while another is active");
            self.end_expedition(false);
        }

        let expedition = Expedition::new(name, starting_supplies);
        info!(
            id = %expedition.id,
            name,
            starting_supplies,
            "Expedition started"
        );
        let event = WorldMapEvent::ExpeditionStateChanged {
            id: expedition.id,
            status: expedition.status,
        };
        self.emit(&event);
        self.current.insert(expedition)
    }

    /// Finish the current expedition as completed or failed.
    ///
    /// Does nothing when no expedition exists.
    pub fn end_expedition(&mut self, success: bool) {
        let Some(mut expedition) = self.current.take() else {
            warn!("No expedition to end");
            return;
        };
        expedition.status = if success {
            ExpeditionStatus::Completed
        } else {
            ExpeditionStatus::Failed
        };
        info!(id = %expedition.id, name = %expedition.name, success, "Expedition ended");
        self.emit(&WorldMapEvent::ExpeditionStateChanged {
            id: expedition.id,
            status: expedition.status,
        });
    }

    /// Whether an expedition exists and has not reached an outcome.
    pub fn is_expedition_active(&self) -> bool {
        self.current.as_ref().is_some_and(|e| !e.status.is_finished())
    }

    /// The current expedition, if any.
    pub const fn current_expedition(&self) -> Option<&Expedition> {
        self.current.as_ref()
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The exploration grid.
    pub const fn exploration(&self) -> &WorldMapExploration {
        &self.exploration
    }

    /// The world-space rectangle mapped onto the grid.
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Name of the save slot.
    pub fn slot(&self) -> &str {
        &self.slot
    }
}
