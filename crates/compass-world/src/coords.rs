//! Coordinate validation and conversion helpers.
//!
//! The typed identifiers in [`compass_types::ids`] make every conversion
//! total. These helpers are the boundary for raw integers (UI clicks,
//! loosely validated save data): validity checks take `i32` and never
//! panic, and the checked builders return `None` for off-grid input.

use compass_types::{AreaId, GlobalId, SubId};

/// Whether `raw` names one of the 256 areas.
pub fn is_valid_area_id(raw: i32) -> bool {
    AreaId::try_from(raw).is_ok()
}

/// Whether `raw` names one of the 256 sub-cells of an area.
pub fn is_valid_sub_id(raw: i32) -> bool {
    SubId::try_from(raw).is_ok()
}

/// Whether `raw` names one of the 65536 global cells.
pub fn is_valid_global_id(raw: i32) -> bool {
    GlobalId::try_from(raw).is_ok()
}

/// Whether `(x, y)` lies on the 256x256 global grid.
pub fn is_valid_global_xy(x: i32, y: i32) -> bool {
    u8::try_from(x).is_ok() && u8::try_from(y).is_ok()
}

/// Compose a global id from an area and a sub-cell.
pub const fn area_sub_to_global(area: AreaId, sub: SubId) -> GlobalId {
    GlobalId::from_area_sub(area, sub)
}

/// Split a global id into its area and sub-cell.
pub const fn global_to_area_sub(id: GlobalId) -> (AreaId, SubId) {
    id.area_sub()
}

/// Global coordinates of a cell.
pub const fn global_to_xy(id: GlobalId) -> (u8, u8) {
    id.xy()
}

/// The cell at global coordinates `(x, y)`.
pub const fn xy_to_global(x: u8, y: u8) -> GlobalId {
    GlobalId::from_xy(x, y)
}

/// The cell at raw global coordinates, or `None` when off the grid.
pub fn xy_to_global_checked(x: i32, y: i32) -> Option<GlobalId> {
    let x = u8::try_from(x).ok()?;
    let y = u8::try_from(y).ok()?;
    Some(GlobalId::from_xy(x, y))
}

/// Compose a global id from raw area and sub-cell indices, or `None` when
/// either is out of range.
pub fn area_sub_to_global_checked(area: i32, sub: i32) -> Option<GlobalId> {
    let area = AreaId::try_from(area).ok()?;
    let sub = SubId::try_from(sub).ok()?;
    Some(GlobalId::from_area_sub(area, sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_bounds() {
        assert!(is_valid_area_id(0));
        assert!(is_valid_area_id(255));
        assert!(!is_valid_area_id(256));
        assert!(!is_valid_area_id(-1));

        assert!(is_valid_sub_id(255));
        assert!(!is_valid_sub_id(256));

        assert!(is_valid_global_id(0));
        assert!(is_valid_global_id(65_535));
        assert!(!is_valid_global_id(65_536));
        assert!(!is_valid_global_id(-1));

        assert!(is_valid_global_xy(255, 0));
        assert!(!is_valid_global_xy(256, 0));
        assert!(!is_valid_global_xy(0, -1));
    }

    #[test]
    fn every_global_id_round_trips() {
        for id in GlobalId::all() {
            let (area, sub) = global_to_area_sub(id);
            assert_eq!(area_sub_to_global(area, sub), id);
            let (x, y) = global_to_xy(id);
            assert_eq!(xy_to_global(x, y), id);
        }
    }

    #[test]
    fn office_cell_position() {
        // Area 8 is (8, 0); sub-cell 0 is its top-left corner.
        let office = area_sub_to_global_checked(8, 0);
        assert_eq!(office.map(global_to_xy), Some((128, 0)));
    }

    #[test]
    fn checked_builders_reject_off_grid_input() {
        assert_eq!(xy_to_global_checked(-1, 0), None);
        assert_eq!(xy_to_global_checked(0, 256), None);
        assert_eq!(xy_to_global_checked(3, 2), Some(GlobalId::new(3 + 2 * 256)));
        assert_eq!(area_sub_to_global_checked(256, 0), None);
        assert_eq!(area_sub_to_global_checked(0, -5), None);
    }
}
