//! Fog-of-war, terrain, and route search for the Fallen Compass world map.
//!
//! The world map is a 256x256 grid of global cells, split into 16x16 areas
//! of 16x16 sub-cells each. This crate owns the per-cell state (revealed or
//! hidden, land or water) and answers route queries over it.
//!
//! # Modules
//!
//! - [`coords`] -- Validation and conversion helpers for raw grid integers.
//! - [`error`] -- Error types for mask construction and terrain loading.
//! - [`exploration`] -- [`WorldMapExploration`], the reveal and land masks.
//! - [`pathfinding`] -- Deterministic breadth-first route search.
//! - [`terrain`] -- Land masks built from grayscale terrain images.

pub mod coords;
pub mod error;
pub mod exploration;
pub mod pathfinding;
pub mod terrain;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use exploration::WorldMapExploration;
pub use terrain::{land_mask_from_pixels, load_land_mask};
