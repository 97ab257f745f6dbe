//! Money and risk of a planned route.
//!
//! Each cell entered after the start contributes to both totals; the
//! start cell itself is free.
//!
//! | Cell entered        | Money | Risk |
//! |---------------------|-------|------|
//! | water, revealed     | 3     | 2    |
//! | water, unrevealed   | 3     | 3    |
//! | land                | 1     | 1    |

use compass_types::{GlobalId, RouteCost};
use compass_world::WorldMapExploration;

/// Money spent entering a water cell.
pub const WATER_MONEY: u32 = 3;

/// Money spent entering a land cell.
pub const LAND_MONEY: u32 = 1;

/// Risk of entering water the player has already seen.
pub const KNOWN_WATER_RISK: u32 = 2;

/// Risk of entering water still under fog.
pub const UNKNOWN_WATER_RISK: u32 = 3;

/// Risk of entering a land cell.
pub const LAND_RISK: u32 = 1;

/// Cost of entering a single cell.
pub fn step_cost(exploration: &WorldMapExploration, cell: GlobalId) -> RouteCost {
    if exploration.is_water(cell) {
        let risk = if exploration.is_revealed(cell) {
            KNOWN_WATER_RISK
        } else {
            UNKNOWN_WATER_RISK
        };
        RouteCost {
            money: WATER_MONEY,
            risk,
        }
    } else {
        RouteCost {
            money: LAND_MONEY,
            risk: LAND_RISK,
        }
    }
}

/// Total cost of `path`, skipping its first cell.
///
/// An empty or single-cell path costs [`RouteCost::ZERO`].
pub fn compute_costs(exploration: &WorldMapExploration, path: &[GlobalId]) -> RouteCost {
    path.iter()
        .skip(1)
        .map(|&cell| step_cost(exploration, cell))
        .fold(RouteCost::ZERO, |total, step| RouteCost {
            money: total.money.saturating_add(step.money),
            risk: total.risk.saturating_add(step.risk),
        })
}
