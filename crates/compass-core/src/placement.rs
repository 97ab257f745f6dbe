//! Mapping continuous world positions onto the global grid.

use compass_types::{GLOBAL_SIZE, GlobalId, WorldBounds};

/// Largest normalized coordinate below `1.0`, so the far edge of the
/// bounds still lands on the last row or column.
const MAX_NORMALIZED: f64 = 1.0 - f64::EPSILON;

/// The grid cell containing world position `(x, y)`.
///
/// Each axis is normalized as `(pos - min) / (max - min)`, clamped to
/// `[0, 1)`, scaled by 256, and floored. Positions outside the bounds
/// therefore land on the nearest edge cell.
///
/// Returns `None` for a non-finite coordinate or a degenerate axis
/// (`max <= min`); such positions name no cell.
pub fn world_to_global(bounds: &WorldBounds, x: f64, y: f64) -> Option<GlobalId> {
    let gx = axis_cell(x, bounds.min_x, bounds.max_x)?;
    let gy = axis_cell(y, bounds.min_y, bounds.max_y)?;
    Some(GlobalId::from_xy(gx, gy))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis_cell(pos: f64, min: f64, max: f64) -> Option<u8> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || !pos.is_finite() {
        return None;
    }
    let t = ((pos - min) / span).clamp(0.0, MAX_NORMALIZED);
    // t is in [0, 1), so the scaled value is in [0, 256).
    Some((t * f64::from(GLOBAL_SIZE)).floor() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_grid_corners() {
        let bounds = WorldBounds::default();
        assert_eq!(
            world_to_global(&bounds, -50_000.0, -50_000.0),
            Some(GlobalId::from_xy(0, 0))
        );
        assert_eq!(
            world_to_global(&bounds, 50_000.0, 50_000.0),
            Some(GlobalId::from_xy(255, 255))
        );
    }

    #[test]
    fn center_maps_to_middle_cell() {
        let bounds = WorldBounds::default();
        assert_eq!(
            world_to_global(&bounds, 0.0, 0.0),
            Some(GlobalId::from_xy(128, 128))
        );
    }

    #[test]
    fn out_of_bounds_positions_clamp() {
        let bounds = WorldBounds::default();
        assert_eq!(
            world_to_global(&bounds, -1e9, 1e9),
            Some(GlobalId::from_xy(0, 255))
        );
    }

    #[test]
    fn cell_width_matches_bounds() {
        let bounds = WorldBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 256.0,
            max_y: 256.0,
        };
        assert_eq!(world_to_global(&bounds, 3.99, 7.0), Some(GlobalId::from_xy(3, 7)));
        assert_eq!(world_to_global(&bounds, 4.0, 7.5), Some(GlobalId::from_xy(4, 7)));
    }

    #[test]
    fn non_finite_positions_name_no_cell() {
        let bounds = WorldBounds::default();
        assert_eq!(world_to_global(&bounds, f64::NAN, 0.0), None);
        assert_eq!(world_to_global(&bounds, 0.0, f64::INFINITY), None);
        assert_eq!(world_to_global(&bounds, f64::NEG_INFINITY, f64::NAN), None);
    }

    #[test]
    fn degenerate_bounds_name_no_cell() {
        let flat = WorldBounds {
            min_x: 10.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 256.0,
        };
        assert_eq!(world_to_global(&flat, 10.0, 5.0), None);

        let inverted = WorldBounds {
            min_x: 0.0,
            min_y: 256.0,
            max_x: 256.0,
            max_y: 0.0,
        };
        assert_eq!(world_to_global(&inverted, 5.0, 5.0), None);
    }
}
