//! A convoy walking a planned route in world space.
//!
//! The convoy yields the world-space center of each route cell in turn.
//! Feeding those positions to the manager reveals the route cell by cell,
//! the same way the overworld convoy does while the player travels.

use compass_types::{GLOBAL_SIZE, GlobalId, WorldBounds};

/// Walks a route one cell per step.
#[derive(Debug, Clone)]
pub struct Convoy {
    route: Vec<GlobalId>,
    bounds: WorldBounds,
    next: usize,
}

impl Convoy {
    /// A convoy at the start of `route`.
    pub const fn new(route: Vec<GlobalId>, bounds: WorldBounds) -> Self {
        Self {
            route,
            bounds,
            next: 0,
        }
    }

    /// Cells still ahead of the convoy.
    pub fn remaining(&self) -> usize {
        self.route.len().saturating_sub(self.next)
    }

    /// Advance one cell and return its world position, or `None` once the
    /// route is finished.
    pub fn step(&mut self) -> Option<(f64, f64)> {
        let cell = *self.route.get(self.next)?;
        self.next = self.next.saturating_add(1);
        Some(cell_center(&self.bounds, cell))
    }
}

/// World-space center of a grid cell.
fn cell_center(bounds: &WorldBounds, cell: GlobalId) -> (f64, f64) {
    let (gx, gy) = cell.xy();
    let size = f64::from(GLOBAL_SIZE);
    let x = bounds.min_x + (f64::from(gx) + 0.5) / size * (bounds.max_x - bounds.min_x);
    let y = bounds.min_y + (f64::from(gy) + 0.5) / size * (bounds.max_y - bounds.min_y);
    (x, y)
}

#[cfg(test)]
mod tests {
    use compass_core::placement::world_to_global;

    use super::*;

    #[test]
    fn positions_map_back_to_route_cells() {
        let route = vec![
            GlobalId::from_xy(0, 0),
            GlobalId::from_xy(1, 0),
            GlobalId::from_xy(255, 255),
        ];
        let bounds = WorldBounds::default();
        let mut convoy = Convoy::new(route.clone(), bounds);

        let mut visited = Vec::new();
        while let Some((x, y)) = convoy.step() {
            visited.extend(world_to_global(&bounds, x, y));
        }
        assert_eq!(visited, route);
        assert_eq!(convoy.remaining(), 0);
        assert_eq!(convoy.step(), None);
    }
}
