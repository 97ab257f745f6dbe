//! Value objects shared between the grid, the planner, and the host.
//!
//! Covers the route plan cached on an expedition, the expedition record
//! itself, the world-space bounds used to place the convoy on the grid,
//! and the persisted exploration record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ExpeditionStatus;
use crate::ids::{AreaId, AreaSub, ExpeditionId, GlobalId};

// ---------------------------------------------------------------------------
// Route planning
// ---------------------------------------------------------------------------

/// Money and risk accumulated along a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RouteCost {
    /// Gold needed to travel the route.
    pub money: u32,
    /// Accumulated danger of the route.
    pub risk: u32,
}

impl RouteCost {
    /// A route that costs nothing (also the cost of "no route").
    pub const ZERO: Self = Self { money: 0, risk: 0 };
}

/// The route preview for a candidate expedition target.
///
/// Created empty when planning begins and replaced wholesale each time a
/// new target is chosen. An empty `path` means "cannot reach", never
/// "free": the cost is zero only because nothing was planned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutePlan {
    /// The area the player selected on the planning map.
    pub selected_area: Option<AreaId>,
    /// The departure cell granted by the selection.
    pub selected_start: Option<AreaSub>,
    /// The cell the preview route leads to.
    pub preview_target: Option<AreaSub>,
    /// Cells from the office to the target, both inclusive.
    pub path: Vec<GlobalId>,
    /// Cached cost of `path`.
    pub cost: RouteCost,
}

impl RoutePlan {
    /// An empty plan with nothing selected.
    pub const fn new() -> Self {
        Self {
            selected_area: None,
            selected_start: None,
            preview_target: None,
            path: Vec::new(),
            cost: RouteCost::ZERO,
        }
    }

    /// Whether a route has been computed.
    pub fn has_route(&self) -> bool {
        !self.path.is_empty()
    }

    /// Drop the computed route and its cost, keeping the selections.
    pub fn clear_route(&mut self) {
        self.path.clear();
        self.cost = RouteCost::ZERO;
    }

    /// Whether the planned route exists and fits within `available_money`.
    pub fn is_affordable(&self, available_money: u32) -> bool {
        self.has_route() && self.cost.money <= available_money
    }
}

// ---------------------------------------------------------------------------
// Expedition
// ---------------------------------------------------------------------------

/// A single expedition, from planning to its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expedition {
    /// Unique identifier.
    pub id: ExpeditionId,
    /// Display name.
    pub name: String,
    /// Supplies allocated at departure.
    pub starting_supplies: u32,
    /// When the expedition was started.
    pub started_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: ExpeditionStatus,
    /// The route chosen for this expedition.
    pub plan: RoutePlan,
}

impl Expedition {
    /// Create an in-progress expedition with an empty plan.
    pub fn new(name: &str, starting_supplies: u32) -> Self {
        Self {
            id: ExpeditionId::new(),
            name: name.to_owned(),
            starting_supplies,
            started_at: Utc::now(),
            status: ExpeditionStatus::InProgress,
            plan: RoutePlan::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// World placement
// ---------------------------------------------------------------------------

/// Axis-aligned world-space rectangle covered by the world map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Smallest world X mapped onto the grid.
    pub min_x: f64,
    /// Smallest world Y mapped onto the grid.
    pub min_y: f64,
    /// Largest world X mapped onto the grid.
    pub max_x: f64,
    /// Largest world Y mapped onto the grid.
    pub max_y: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -50_000.0,
            min_y: -50_000.0,
            max_x: 50_000.0,
            max_y: 50_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// The persisted exploration record: both masks, one byte per global cell.
///
/// The byte layout inside a save slot is owned by the save backend; this
/// record only fixes which two arrays travel together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExplorationSave {
    /// Fog-of-war mask (`>= 128` means revealed).
    pub reveal_mask: Vec<u8>,
    /// Terrain mask (non-zero means land).
    pub land_mask: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SubId;

    #[test]
    fn empty_plan_is_not_affordable() {
        let plan = RoutePlan::new();
        assert!(!plan.has_route());
        assert!(!plan.is_affordable(u32::MAX));
    }

    #[test]
    fn affordability_compares_money_only() {
        let mut plan = RoutePlan::new();
        plan.path = vec![GlobalId::new(0), GlobalId::new(1)];
        plan.cost = RouteCost { money: 7, risk: 100 };
        assert!(plan.is_affordable(7));
        assert!(!plan.is_affordable(6));
    }

    #[test]
    fn clear_route_keeps_selection() {
        let mut plan = RoutePlan::new();
        plan.selected_area = Some(AreaId::new(24));
        plan.preview_target = Some(AreaSub::new(AreaId::new(25), SubId::new(10)));
        plan.path = vec![GlobalId::new(3)];
        plan.cost = RouteCost { money: 3, risk: 3 };
        plan.clear_route();
        assert_eq!(plan.selected_area, Some(AreaId::new(24)));
        assert!(plan.path.is_empty());
        assert_eq!(plan.cost, RouteCost::ZERO);
    }

    #[test]
    fn new_expedition_is_in_progress() {
        let expedition = Expedition::new("First Voyage", 40);
        assert_eq!(expedition.status, ExpeditionStatus::InProgress);
        assert_eq!(expedition.starting_supplies, 40);
        assert!(!expedition.plan.has_route());
    }

    #[test]
    fn exploration_save_round_trips_through_json() {
        let save = ExplorationSave {
            reveal_mask: vec![0, 255, 0],
            land_mask: vec![1, 1, 0],
        };
        let json = serde_json::to_string(&save).unwrap_or_default();
        let back: ExplorationSave = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back, save);
    }
}
