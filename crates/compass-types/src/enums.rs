//! Enumeration types for the world map and expedition lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an expedition, from departure through its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpeditionStatus {
    /// The convoy has departed.
    InProgress,
    /// The expedition reached its goal.
    Completed,
    /// The expedition was abandoned or lost.
    Failed,
}

impl ExpeditionStatus {
    /// Whether the expedition has reached a final outcome.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Terrain classification of a single global cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Walkable ground. Only passable once revealed, except as a goal.
    Land,
    /// Open water. Always passable.
    Water,
}

impl Terrain {
    /// Classify an 8-bit terrain-mask pixel: `<= 128` is land, brighter is water.
    pub const fn from_pixel(value: u8) -> Self {
        if value <= 128 { Self::Land } else { Self::Water }
    }

    /// The byte stored in a land mask for this terrain (`1` land, `0` water).
    pub const fn mask_byte(self) -> u8 {
        match self {
            Self::Land => 1,
            Self::Water => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_threshold_is_inclusive_for_land() {
        assert_eq!(Terrain::from_pixel(0), Terrain::Land);
        assert_eq!(Terrain::from_pixel(128), Terrain::Land);
        assert_eq!(Terrain::from_pixel(129), Terrain::Water);
        assert_eq!(Terrain::from_pixel(255), Terrain::Water);
    }

    #[test]
    fn finished_statuses() {
        assert!(!ExpeditionStatus::InProgress.is_finished());
        assert!(ExpeditionStatus::Completed.is_finished());
        assert!(ExpeditionStatus::Failed.is_finished());
    }
}
