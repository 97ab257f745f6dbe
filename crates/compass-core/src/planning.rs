//! Route planning from the office to the preview target.
//!
//! The planning map offers exactly one selectable area at a time (the
//! "available start"). Selecting it records the selection on the plan and
//! builds a preview route from the office to the preview target. Both
//! anchor pairs are supplied by the planning UI; the planner only reads
//! them.

use compass_types::{AreaId, AreaSub, RoutePlan};
use compass_world::WorldMapExploration;
use tracing::{debug, info, warn};

use crate::config::WorldMapConfig;
use crate::cost::compute_costs;

/// Fixed anchors used to turn a selection into a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePlanner {
    /// Departure cell of every route.
    pub office: AreaSub,
    /// The one area the player may select, and the start it grants.
    pub available_start: AreaSub,
    /// Destination of the preview route.
    pub preview_target: AreaSub,
}

impl RoutePlanner {
    /// A planner with explicit anchors.
    pub const fn new(office: AreaSub, available_start: AreaSub, preview_target: AreaSub) -> Self {
        Self {
            office,
            available_start,
            preview_target,
        }
    }

    /// A planner using the anchors from configuration.
    pub const fn from_config(config: &WorldMapConfig) -> Self {
        Self::new(config.office, config.available_start, config.preview_target)
    }

    /// Select an area on the planning map.
    ///
    /// Only the configured available-start area is accepted; anything else
    /// (including ids off the grid) returns `false` and leaves `plan`
    /// untouched. On acceptance the selection is recorded and the preview
    /// route rebuilt; the return value is `true` even if no route exists,
    /// since the selection itself succeeded.
    pub fn select_area(
        &self,
        plan: &mut RoutePlan,
        exploration: &WorldMapExploration,
        area: impl TryInto<AreaId>,
    ) -> bool {
        let Ok(area) = area.try_into() else {
            warn!("Rejected area selection off the grid");
            return false;
        };
        if area != self.available_start.area {
            debug!(%area, allowed = %self.available_start.area, "Rejected area selection");
            return false;
        }

        plan.selected_area = Some(area);
        plan.selected_start = Some(self.available_start);
        info!(%area, start = %self.available_start, "Area selected");

        let _ = self.build_preview_route(plan, exploration);
        true
    }

    /// Rebuild the preview route from the office to the preview target.
    ///
    /// On success the plan holds the new path and its cost. When no route
    /// exists the path is cleared and both costs are zero.
    pub fn build_preview_route(&self, plan: &mut RoutePlan, exploration: &WorldMapExploration) -> bool {
        let start = self.office.global();
        let goal = self.preview_target.global();
        plan.preview_target = Some(self.preview_target);

        let Some(path) = exploration.find_shortest_path(start, goal) else {
            plan.clear_route();
            warn!(from = %self.office, to = %self.preview_target, "No preview route");
            return false;
        };

        plan.cost = compute_costs(exploration, &path);
        plan.path = path;
        debug!(
            cells = plan.path.len(),
            money = plan.cost.money,
            risk = plan.cost.risk,
            "Preview route built"
        );
        true
    }

    /// Drop the preview route and its cost, keeping the selection.
    pub fn clear_preview_route(plan: &mut RoutePlan) {
        plan.clear_route();
    }
}
