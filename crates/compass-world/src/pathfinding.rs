//! Breadth-first route search over the global grid.
//!
//! Routes move between 4-connected cells (no diagonals). Whether a cell
//! may be entered depends on its terrain, its reveal state, and whether it
//! is the goal:
//!
//! | Cell                 | Traversable            |
//! |----------------------|------------------------|
//! | the goal             | only if it is land     |
//! | water                | always                 |
//! | land (not the goal)  | only if revealed       |
//!
//! The goal exception lets the player route to land that is still hidden
//! under fog, while the interior of a route must run through known land or
//! open water.
//!
//! Neighbors are expanded in the fixed order `+x`, `-x`, `+y`, `-y`, so a
//! given grid state always yields the same path. A search touches at most
//! [`GLOBAL_COUNT`] cells; it is meant for interactive route planning, not
//! for per-frame use.

use std::collections::VecDeque;

use compass_types::{GLOBAL_COUNT, GlobalId, Terrain};
use tracing::{debug, trace, warn};

use crate::exploration::WorldMapExploration;

impl WorldMapExploration {
    /// Whether a route towards `goal` may enter `cell`.
    pub fn is_traversable(&self, cell: GlobalId, goal: GlobalId) -> bool {
        let terrain = self.terrain(cell);
        let traversable = if cell == goal {
            terrain == Some(Terrain::Land)
        } else {
            match terrain {
                Some(Terrain::Water) => true,
                Some(Terrain::Land) => self.is_revealed(cell),
                None => false,
            }
        };
        trace!(%cell, %goal, ?terrain, traversable, "Traversal check");
        traversable
    }

    /// Find the shortest 4-connected route from `start` to `goal`.
    ///
    /// Returns the cells from `start` to `goal`, both inclusive, with no
    /// cell repeated. Returns `None` when either id is off the grid, when
    /// `start` itself is not traversable, or when the goal cannot be
    /// reached. A failed search never yields a partial route.
    pub fn find_shortest_path(
        &self,
        start: impl TryInto<GlobalId>,
        goal: impl TryInto<GlobalId>,
    ) -> Option<Vec<GlobalId>> {
        let (Some(start), Some(goal)) = (start.try_into().ok(), goal.try_into().ok()) else {
            warn!("Route search given a start or goal off the grid");
            return None;
        };

        debug!(%start, %goal, "Searching for route");

        if !self.is_traversable(start, goal) {
            warn!(%start, %goal, "Route start is not traversable");
            return None;
        }

        // Predecessor of every discovered cell; the start points at itself.
        let mut came_from: Vec<Option<GlobalId>> = vec![None; GLOBAL_COUNT];
        if let Some(slot) = came_from.get_mut(start.index()) {
            *slot = Some(start);
        }

        let mut frontier = VecDeque::new();
        frontier.push_back(start);

        let mut found = false;
        while let Some(current) = frontier.pop_front() {
            if current == goal {
                found = true;
                break;
            }

            for neighbor in current.neighbors() {
                let Some(slot) = came_from.get_mut(neighbor.index()) else {
                    continue;
                };
                if slot.is_some() {
                    continue;
                }
                if !self.is_traversable(neighbor, goal) {
                    continue;
                }
                *slot = Some(current);
                frontier.push_back(neighbor);
            }
        }

        if !found {
            warn!(%start, %goal, "No route found");
            return None;
        }

        let path = reconstruct(&came_from, start, goal)?;
        debug!(%start, %goal, cells = path.len(), "Route found");
        Some(path)
    }
}

/// Walk predecessors back from `goal` and return the route in travel order.
fn reconstruct(came_from: &[Option<GlobalId>], start: GlobalId, goal: GlobalId) -> Option<Vec<GlobalId>> {
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        let Some(previous) = came_from.get(node.index()).copied().flatten() else {
            warn!(%node, "Broken predecessor chain while rebuilding route");
            return None;
        };
        path.push(previous);
        node = previous;
    }
    path.reverse();
    Some(path)
}
