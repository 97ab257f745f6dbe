//! Fog-of-war and terrain state for the 256x256 global grid.
//!
//! [`WorldMapExploration`] owns two flat byte masks with one entry per
//! global cell:
//!
//! - the **reveal mask** (`>= 128` revealed; writes store `255` or `0`),
//! - the **land mask** (non-zero land, zero water; all land until a
//!   terrain mask is supplied).
//!
//! Both masks are exactly [`GLOBAL_COUNT`] bytes long at all times. Any
//! replacement of a different length is ignored and the previous mask is
//! kept. Queries accept anything convertible into a [`GlobalId`], so raw
//! integers from UI or save data can be passed directly and resolve to
//! `false` when out of range.

use compass_types::{AreaId, ExplorationSave, GLOBAL_COUNT, GlobalId, SUB_COUNT, Terrain};
use tracing::{debug, info, warn};

use crate::error::WorldError;

/// Reveal byte written for a revealed cell.
const REVEALED: u8 = 255;

/// Reveal byte written for a hidden cell.
const HIDDEN: u8 = 0;

/// Reveal bytes at or above this value count as revealed.
const REVEAL_THRESHOLD: u8 = 128;

/// Exploration state of the world map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ExplorationSave", into = "ExplorationSave")]
pub struct WorldMapExploration {
    /// One reveal byte per global cell.
    reveal_mask: Vec<u8>,
    /// One terrain byte per global cell.
    land_mask: Vec<u8>,
}

impl WorldMapExploration {
    /// A fully hidden map where every cell is land.
    pub fn new() -> Self {
        Self {
            reveal_mask: vec![HIDDEN; GLOBAL_COUNT],
            land_mask: vec![Terrain::Land.mask_byte(); GLOBAL_COUNT],
        }
    }

    /// Build exploration state from previously saved masks.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MaskLength`] if either mask is not exactly
    /// [`GLOBAL_COUNT`] bytes long.
    pub fn from_masks(reveal_mask: Vec<u8>, land_mask: Vec<u8>) -> Result<Self, WorldError> {
        check_length("reveal", &reveal_mask)?;
        check_length("land", &land_mask)?;
        Ok(Self {
            reveal_mask,
            land_mask,
        })
    }

    // -------------------------------------------------------------------
    // Reveal mask
    // -------------------------------------------------------------------

    /// The raw reveal mask.
    pub fn reveal_mask(&self) -> &[u8] {
        &self.reveal_mask
    }

    /// Whether the cell is revealed. `false` for ids off the grid.
    pub fn is_revealed(&self, id: impl TryInto<GlobalId>) -> bool {
        id.try_into()
            .ok()
            .and_then(|cell| self.reveal_mask.get(cell.index()))
            .is_some_and(|&byte| byte >= REVEAL_THRESHOLD)
    }

    /// Set the reveal state of a cell.
    ///
    /// Returns `true` only when the stored value actually changed. Ids off
    /// the grid and redundant writes return `false` and touch nothing, so
    /// callers can use the result to decide whether downstream work (fog
    /// redraw, autosave) is needed.
    pub fn set_revealed(&mut self, id: impl TryInto<GlobalId>, revealed: bool) -> bool {
        let Some(cell) = id.try_into().ok() else {
            return false;
        };
        let Some(slot) = self.reveal_mask.get_mut(cell.index()) else {
            return false;
        };
        if (*slot >= REVEAL_THRESHOLD) == revealed {
            return false;
        }
        *slot = if revealed { REVEALED } else { HIDDEN };
        true
    }

    /// Replace the reveal mask wholesale.
    ///
    /// Returns `false` and keeps the current mask when `mask` is not
    /// exactly [`GLOBAL_COUNT`] bytes long.
    pub fn set_reveal_mask(&mut self, mask: &[u8]) -> bool {
        if mask.len() != GLOBAL_COUNT {
            warn!(len = mask.len(), "Ignoring reveal mask with wrong length");
            return false;
        }
        self.reveal_mask.copy_from_slice(mask);
        true
    }

    /// Reveal every sub-cell of an area. Returns how many cells changed.
    pub fn reveal_area(&mut self, area: AreaId) -> usize {
        area.cells()
            .filter(|&cell| self.set_revealed(cell, true))
            .count()
    }

    /// Apply the default revealed areas of a new game.
    ///
    /// Every sub-cell of each valid area id is revealed. Invalid ids are
    /// skipped with a warning. Re-applying the same list changes nothing.
    /// Returns how many cells changed.
    pub fn apply_default_revealed_areas(&mut self, area_ids: &[i32]) -> usize {
        info!(count = area_ids.len(), "Applying default revealed areas");

        let mut changed: usize = 0;
        for &raw in area_ids {
            let Ok(area) = AreaId::try_from(raw) else {
                warn!(area = raw, "Ignoring invalid default revealed area");
                continue;
            };
            changed = changed.saturating_add(self.reveal_area(area));
        }

        info!(changed, "Default reveal complete");
        changed
    }

    /// Number of revealed cells on the whole map.
    pub fn revealed_count(&self) -> usize {
        self.reveal_mask
            .iter()
            .filter(|&&byte| byte >= REVEAL_THRESHOLD)
            .count()
    }

    /// Number of revealed sub-cells inside an area (0 to 256).
    pub fn revealed_in_area(&self, area: AreaId) -> usize {
        area.cells().filter(|&cell| self.is_revealed(cell)).count()
    }

    /// Fraction of an area that has been revealed, from `0.0` to `1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn explored_fraction(&self, area: AreaId) -> f64 {
        // Both values are at most 256, far below f64 precision limits.
        self.revealed_in_area(area) as f64 / SUB_COUNT as f64
    }

    // -------------------------------------------------------------------
    // Land mask
    // -------------------------------------------------------------------

    /// The raw land mask.
    pub fn land_mask(&self) -> &[u8] {
        &self.land_mask
    }

    /// Replace the land mask wholesale.
    ///
    /// Returns `false` and keeps the current mask when `mask` is not
    /// exactly [`GLOBAL_COUNT`] bytes long. This is expected on first run
    /// when no terrain image is configured, so it is not an error.
    pub fn set_land_mask(&mut self, mask: &[u8]) -> bool {
        if mask.len() != GLOBAL_COUNT {
            warn!(len = mask.len(), "Ignoring land mask with wrong length");
            return false;
        }
        self.land_mask.copy_from_slice(mask);
        debug!("Land mask replaced");
        true
    }

    /// Replace the land mask, reporting a wrong length as an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MaskLength`] and keeps the current mask when
    /// `mask` is not exactly [`GLOBAL_COUNT`] bytes long.
    pub fn try_set_land_mask(&mut self, mask: Vec<u8>) -> Result<(), WorldError> {
        check_length("land", &mask)?;
        self.land_mask = mask;
        Ok(())
    }

    /// Terrain of a cell, or `None` for ids off the grid.
    pub fn terrain(&self, id: impl TryInto<GlobalId>) -> Option<Terrain> {
        let cell = id.try_into().ok()?;
        let byte = self.land_mask.get(cell.index())?;
        Some(if *byte == 0 {
            Terrain::Water
        } else {
            Terrain::Land
        })
    }

    /// Whether the cell is land. `false` for ids off the grid.
    pub fn is_land(&self, id: impl TryInto<GlobalId>) -> bool {
        self.terrain(id) == Some(Terrain::Land)
    }

    /// Whether the cell is water, defined as "not land".
    ///
    /// Ids off the grid therefore report `true`; callers that care must
    /// validate first.
    pub fn is_water(&self, id: impl TryInto<GlobalId>) -> bool {
        !self.is_land(id)
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Copy both masks into a save record.
    pub fn snapshot(&self) -> ExplorationSave {
        ExplorationSave {
            reveal_mask: self.reveal_mask.clone(),
            land_mask: self.land_mask.clone(),
        }
    }
}

impl Default for WorldMapExploration {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ExplorationSave> for WorldMapExploration {
    type Error = WorldError;

    fn try_from(save: ExplorationSave) -> Result<Self, Self::Error> {
        Self::from_masks(save.reveal_mask, save.land_mask)
    }
}

impl From<WorldMapExploration> for ExplorationSave {
    fn from(exploration: WorldMapExploration) -> Self {
        Self {
            reveal_mask: exploration.reveal_mask,
            land_mask: exploration.land_mask,
        }
    }
}

/// Reject masks that do not cover the global grid exactly.
fn check_length(mask: &'static str, bytes: &[u8]) -> Result<(), WorldError> {
    if bytes.len() == GLOBAL_COUNT {
        Ok(())
    } else {
        Err(WorldError::MaskLength {
            mask,
            expected: GLOBAL_COUNT,
            actual: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use compass_types::SubId;

    use super::*;

    #[test]
    fn fresh_map_is_hidden_land() {
        let map = WorldMapExploration::new();
        assert_eq!(map.reveal_mask().len(), GLOBAL_COUNT);
        assert_eq!(map.land_mask().len(), GLOBAL_COUNT);
        assert_eq!(map.revealed_count(), 0);
        assert!(map.is_land(0));
        assert!(map.is_land(65_535));
    }

    #[test]
    fn set_revealed_reports_changes_only() {
        let mut map = WorldMapExploration::new();
        assert!(map.set_revealed(1234, true));
        assert!(!map.set_revealed(1234, true));
        assert!(map.is_revealed(1234));
        assert!(map.set_revealed(1234, false));
        assert!(!map.is_revealed(1234));
    }

    #[test]
    fn invalid_ids_are_safe() {
        let mut map = WorldMapExploration::new();
        assert!(!map.is_revealed(-1));
        assert!(!map.is_revealed(65_536));
        assert!(!map.set_revealed(100_000, true));
        assert!(!map.is_land(-1));
        assert!(map.is_water(70_000));
        assert_eq!(map.terrain(65_536), None);
        assert_eq!(map.revealed_count(), 0);
    }

    #[test]
    fn threshold_reads_partial_bytes() {
        let mut mask = vec![0_u8; GLOBAL_COUNT];
        if let Some(byte) = mask.get_mut(10) {
            *byte = 128;
        }
        if let Some(byte) = mask.get_mut(11) {
            *byte = 127;
        }
        let mut map = WorldMapExploration::new();
        assert!(map.set_reveal_mask(&mask));
        assert!(map.is_revealed(10));
        assert!(!map.is_revealed(11));
        // Already revealed by threshold: a redundant write changes nothing.
        assert!(!map.set_revealed(10, true));
        assert_eq!(map.reveal_mask().get(10), Some(&128));
        assert!(map.set_revealed(11, true));
        assert_eq!(map.reveal_mask().get(11), Some(&255));
    }

    #[test]
    fn default_reveal_covers_exactly_one_area() {
        let mut map = WorldMapExploration::new();
        let changed = map.apply_default_revealed_areas(&[5]);
        assert_eq!(changed, SUB_COUNT);

        let area = AreaId::new(5);
        for id in GlobalId::all() {
            assert_eq!(map.is_revealed(id), id.area() == area, "cell {id}");
        }
    }

    #[test]
    fn default_reveal_skips_invalid_and_is_idempotent() {
        let mut map = WorldMapExploration::new();
        let first = map.apply_default_revealed_areas(&[-1, 3, 256, 3]);
        assert_eq!(first, SUB_COUNT);
        let second = map.apply_default_revealed_areas(&[3]);
        assert_eq!(second, 0);
        assert_eq!(map.revealed_count(), SUB_COUNT);
    }

    #[test]
    fn explored_fraction_per_area() {
        let mut map = WorldMapExploration::new();
        let area = AreaId::new(40);
        for raw in 0..64_u8 {
            let _ = map.set_revealed(area.cell(SubId::new(raw)), true);
        }
        assert!((map.explored_fraction(area) - 0.25).abs() < f64::EPSILON);
        assert_eq!(map.revealed_in_area(AreaId::new(41)), 0);
    }

    #[test]
    fn land_mask_shape_guard() {
        let mut map = WorldMapExploration::new();
        let mut water = vec![1_u8; GLOBAL_COUNT];
        if let Some(byte) = water.get_mut(7) {
            *byte = 0;
        }
        assert!(map.set_land_mask(&water));
        assert!(map.is_water(7));

        assert!(!map.set_land_mask(&[0_u8; 100]));
        assert_eq!(map.land_mask().len(), GLOBAL_COUNT);
        assert!(map.is_water(7));
        assert!(map.is_land(8));
    }

    #[test]
    fn strict_constructors_report_length() {
        let result = WorldMapExploration::from_masks(vec![0; 10], vec![1; GLOBAL_COUNT]);
        assert!(matches!(
            result,
            Err(WorldError::MaskLength {
                mask: "reveal",
                actual: 10,
                ..
            })
        ));

        let mut map = WorldMapExploration::new();
        assert!(map.try_set_land_mask(vec![0; 3]).is_err());
        assert!(map.is_land(0));
    }

    #[test]
    fn serde_round_trip_validates_length() {
        let mut map = WorldMapExploration::new();
        let _ = map.set_revealed(99, true);
        let json = serde_json::to_string(&map).unwrap_or_default();
        let back: Result<WorldMapExploration, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(map));

        let bad = r#"{"reveal_mask":[0,1],"land_mask":[1]}"#;
        let parsed: Result<WorldMapExploration, _> = serde_json::from_str(bad);
        assert!(parsed.is_err());
    }

    #[test]
    fn snapshot_copies_both_masks() {
        let mut map = WorldMapExploration::new();
        let _ = map.set_revealed(5, true);
        let save = map.snapshot();
        assert_eq!(save.reveal_mask.get(5), Some(&255));
        assert_eq!(save.land_mask.len(), GLOBAL_COUNT);
    }
}
