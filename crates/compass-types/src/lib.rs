//! Shared type definitions for the Fallen Compass world map.
//!
//! This crate is the single source of truth for the identifiers and value
//! objects passed between the exploration grid, the expedition planner,
//! and the host game loop.
//!
//! # Modules
//!
//! - [`ids`] -- Grid identifiers (`AreaId`, `SubId`, `GlobalId`) and the
//!   UUID-backed `ExpeditionId`
//! - [`enums`] -- Expedition status and terrain classification
//! - [`structs`] -- Route plans, expeditions, world bounds, save records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ExpeditionStatus, Terrain};
pub use ids::{
    AreaId, AreaSub, ExpeditionId, GLOBAL_COUNT, GLOBAL_SIZE, GRID_SIZE, GlobalId,
    GridIdError, SUB_COUNT, SUB_SIZE, SubId,
};
pub use structs::{Expedition, ExplorationSave, RouteCost, RoutePlan, WorldBounds};
