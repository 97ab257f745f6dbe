//! Type-safe identifier wrappers.
//!
//! Two families of identifiers live here:
//!
//! - [`ExpeditionId`] wraps a [`Uuid`] (v7, time-ordered) like every other
//!   entity identifier in the workspace.
//! - [`AreaId`], [`SubId`] and [`GlobalId`] address the world-map grid.
//!   The grid is 16x16 areas of 16x16 sub-cells, giving a 256x256 global
//!   grid. Every value representable by these types is a valid cell, so
//!   the conversions between them are total. Raw integers coming from UI
//!   or save data go through [`TryFrom`], which rejects out-of-range input
//!   instead of panicking.
//!
//! # Layout
//!
//! ```text
//! AreaId   = area_x + area_y * 16          (0..256)
//! SubId    = sub_x  + sub_y  * 16          (0..256)
//! GlobalId = global_x + global_y * 256     (0..65536)
//! global_x = area_x * 16 + sub_x
//! global_y = area_y * 16 + sub_y
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of areas along one side of the world map.
pub const GRID_SIZE: u8 = 16;

/// Number of sub-cells along one side of an area.
pub const SUB_SIZE: u8 = 16;

/// Number of global cells along one side of the world map.
pub const GLOBAL_SIZE: u16 = 256;

/// Number of sub-cells inside one area.
pub const SUB_COUNT: usize = 256;

/// Number of global cells on the world map (and the length of every mask).
pub const GLOBAL_COUNT: usize = 65_536;

/// Mask selecting the low nibble (position inside an area).
const NIBBLE: u8 = 0x0F;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an expedition.
    ExpeditionId
}

/// A raw grid identifier that does not address a cell of the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id {raw} out of range (0..{limit})")]
pub struct GridIdError {
    /// Which identifier space the value was meant for.
    pub kind: &'static str,
    /// The rejected raw value (saturated to `i64`).
    pub raw: i64,
    /// Exclusive upper bound of the identifier space.
    pub limit: u32,
}

/// Generates the raw-integer conversions shared by the grid identifiers.
macro_rules! grid_id_conversions {
    ($name:ident, $inner:ty, $kind:literal, $limit:expr) => {
        impl TryFrom<i32> for $name {
            type Error = GridIdError;

            fn try_from(raw: i32) -> Result<Self, Self::Error> {
                <$inner>::try_from(raw).ok().map(Self).ok_or(GridIdError {
                    kind: $kind,
                    raw: i64::from(raw),
                    limit: $limit,
                })
            }
        }

        impl TryFrom<i64> for $name {
            type Error = GridIdError;

            fn try_from(raw: i64) -> Result<Self, Self::Error> {
                <$inner>::try_from(raw).ok().map(Self).ok_or(GridIdError {
                    kind: $kind,
                    raw,
                    limit: $limit,
                })
            }
        }

        impl TryFrom<usize> for $name {
            type Error = GridIdError;

            fn try_from(raw: usize) -> Result<Self, Self::Error> {
                <$inner>::try_from(raw).ok().map(Self).ok_or(GridIdError {
                    kind: $kind,
                    raw: i64::try_from(raw).unwrap_or(i64::MAX),
                    limit: $limit,
                })
            }
        }

        impl From<$inner> for $name {
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// One of the 256 coarse areas of the world map (`area_x + area_y * 16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(u8);

impl AreaId {
    /// Wrap a raw area index. Every `u8` is a valid area.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Build an area id from area coordinates; `None` if either is `>= 16`.
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return None;
        }
        Some(Self(x | (y << 4)))
    }

    /// Area coordinates `(area_x, area_y)`, origin top-left.
    pub const fn xy(self) -> (u8, u8) {
        (self.0 & NIBBLE, self.0 >> 4)
    }

    /// The raw area index.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The global id of one sub-cell of this area.
    pub const fn cell(self, sub: SubId) -> GlobalId {
        GlobalId::from_area_sub(self, sub)
    }

    /// Every global cell of this area, row by row.
    pub fn cells(self) -> impl Iterator<Item = GlobalId> {
        SubId::all().map(move |sub| self.cell(sub))
    }

    /// Iterate over all 256 areas in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (u8::MIN..=u8::MAX).map(Self)
    }
}

grid_id_conversions!(AreaId, u8, "area", 256);

/// One of the 256 sub-cells inside an area (`sub_x + sub_y * 16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubId(u8);

impl SubId {
    /// Wrap a raw sub-cell index. Every `u8` is a valid sub-cell.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Build a sub-cell id from in-area coordinates; `None` if either is `>= 16`.
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= SUB_SIZE || y >= SUB_SIZE {
            return None;
        }
        Some(Self(x | (y << 4)))
    }

    /// In-area coordinates `(sub_x, sub_y)`.
    pub const fn xy(self) -> (u8, u8) {
        (self.0 & NIBBLE, self.0 >> 4)
    }

    /// The raw sub-cell index.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Iterate over all 256 sub-cells in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (u8::MIN..=u8::MAX).map(Self)
    }
}

grid_id_conversions!(SubId, u8, "sub-cell", 256);

/// One cell of the 256x256 global grid (`global_x + global_y * 256`).
///
/// The id space is exactly the `u16` range, so the inner value doubles as
/// the little-endian pair `[global_x, global_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(u16);

impl GlobalId {
    /// Wrap a raw global index. Every `u16` is a valid cell.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Build a global id from global coordinates.
    pub const fn from_xy(x: u8, y: u8) -> Self {
        Self(u16::from_le_bytes([x, y]))
    }

    /// Global coordinates `(global_x, global_y)`.
    pub const fn xy(self) -> (u8, u8) {
        let [x, y] = self.0.to_le_bytes();
        (x, y)
    }

    /// Compose a global id from an area and a sub-cell inside it.
    pub const fn from_area_sub(area: AreaId, sub: SubId) -> Self {
        let (area_x, area_y) = area.xy();
        let (sub_x, sub_y) = sub.xy();
        Self::from_xy((area_x << 4) | sub_x, (area_y << 4) | sub_y)
    }

    /// Split a global id into its area and sub-cell.
    pub const fn area_sub(self) -> (AreaId, SubId) {
        let (x, y) = self.xy();
        let area = AreaId((x >> 4) | ((y >> 4) << 4));
        let sub = SubId((x & NIBBLE) | ((y & NIBBLE) << 4));
        (area, sub)
    }

    /// The area containing this cell.
    pub const fn area(self) -> AreaId {
        self.area_sub().0
    }

    /// The raw global index.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Position of this cell inside a 65536-entry mask.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// The 4-connected neighbors that lie on the grid, in the fixed order
    /// `+x`, `-x`, `+y`, `-y`.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        let (x, y) = self.xy();
        [
            x.checked_add(1).map(|nx| Self::from_xy(nx, y)),
            x.checked_sub(1).map(|nx| Self::from_xy(nx, y)),
            y.checked_add(1).map(|ny| Self::from_xy(x, ny)),
            y.checked_sub(1).map(|ny| Self::from_xy(x, ny)),
        ]
        .into_iter()
        .flatten()
    }

    /// Iterate over all 65536 cells in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (u16::MIN..=u16::MAX).map(Self)
    }
}

grid_id_conversions!(GlobalId, u16, "global", 65_536);

/// An `(area, sub-cell)` pair naming one global cell.
///
/// Used for configured anchor points such as the office departure cell
/// and the current planning target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaSub {
    /// The area.
    pub area: AreaId,
    /// The sub-cell inside the area.
    pub sub: SubId,
}

impl AreaSub {
    /// Pair an area with a sub-cell.
    pub const fn new(area: AreaId, sub: SubId) -> Self {
        Self { area, sub }
    }

    /// The global cell this pair names.
    pub const fn global(self) -> GlobalId {
        GlobalId::from_area_sub(self.area, self.sub)
    }
}

impl From<GlobalId> for AreaSub {
    fn from(id: GlobalId) -> Self {
        let (area, sub) = id.area_sub();
        Self { area, sub }
    }
}

impl core::fmt::Display for AreaSub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.area, self.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expedition_ids_are_unique() {
        let a = ExpeditionId::new();
        let b = ExpeditionId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn global_id_round_trips_through_area_sub_and_xy() {
        for id in GlobalId::all() {
            let (area, sub) = id.area_sub();
            assert_eq!(GlobalId::from_area_sub(area, sub), id);
            let (x, y) = id.xy();
            assert_eq!(GlobalId::from_xy(x, y), id);
        }
    }

    #[test]
    fn composition_matches_row_major_layout() {
        // Area 17 is (1, 1); sub-cell 18 is (2, 1).
        let area = AreaId::new(17);
        let sub = SubId::new(18);
        let id = GlobalId::from_area_sub(area, sub);
        assert_eq!(id.xy(), (18, 17));
        assert_eq!(id.get(), 18 + 17 * 256);
    }

    #[test]
    fn area_and_sub_xy_are_inverse() {
        for area in AreaId::all() {
            let (x, y) = area.xy();
            assert_eq!(AreaId::from_xy(x, y), Some(area));
        }
        assert_eq!(SubId::from_xy(16, 0), None);
        assert_eq!(AreaId::from_xy(0, 16), None);
    }

    #[test]
    fn raw_conversions_reject_out_of_range() {
        assert!(GlobalId::try_from(-1_i32).is_err());
        assert!(GlobalId::try_from(65_536_i32).is_err());
        assert!(GlobalId::try_from(100_000_usize).is_err());
        assert_eq!(GlobalId::try_from(65_535_i32).map(GlobalId::get), Ok(65_535));
        assert!(AreaId::try_from(256_i32).is_err());
        assert!(SubId::try_from(-3_i64).is_err());
        assert_eq!(AreaId::try_from(255_i32), Ok(AreaId::new(255)));
    }

    #[test]
    fn grid_id_error_message() {
        let err = AreaId::try_from(300_i32).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("area id 300 out of range (0..256)".to_owned())
        );
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let id = GlobalId::from_xy(10, 20);
        let found: Vec<(u8, u8)> = id.neighbors().map(GlobalId::xy).collect();
        assert_eq!(found, vec![(11, 20), (9, 20), (10, 21), (10, 19)]);
    }

    #[test]
    fn corner_neighbors_stay_on_grid() {
        let origin: Vec<GlobalId> = GlobalId::from_xy(0, 0).neighbors().collect();
        assert_eq!(origin, vec![GlobalId::from_xy(1, 0), GlobalId::from_xy(0, 1)]);
        let far = GlobalId::from_xy(255, 255).neighbors().count();
        assert_eq!(far, 2);
    }

    #[test]
    fn area_cells_cover_one_block() {
        let area = AreaId::new(5);
        let cells: Vec<GlobalId> = area.cells().collect();
        assert_eq!(cells.len(), SUB_COUNT);
        assert!(cells.iter().all(|c| c.area() == area));
    }

    #[test]
    fn area_sub_display_and_global() {
        let pair = AreaSub::new(AreaId::new(8), SubId::new(0));
        assert_eq!(pair.to_string(), "8/0");
        assert_eq!(AreaSub::from(pair.global()), pair);
    }

    #[test]
    fn grid_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&GlobalId::new(513)).unwrap_or_default();
        assert_eq!(json, "513");
        let sub: Result<SubId, _> = serde_json::from_str("300");
        assert!(sub.is_err());
    }
}
