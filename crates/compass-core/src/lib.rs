//! Route planning, expedition lifecycle, and exploration persistence for
//! Fallen Compass.
//!
//! This crate drives the world-map grid from `compass-world`: it turns a
//! planning-map selection into a priced route, reveals cells as the convoy
//! moves, and keeps the exploration masks saved without writing on every
//! step.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `fallen-compass.yaml` into
//!   strongly-typed structs.
//! - [`cost`] -- Money and risk of a route.
//! - [`debounce`] -- Autosave [`Debouncer`] and the [`MonotonicClock`]
//!   it runs on.
//! - [`events`] -- [`WorldMapEvent`] notifications and the
//!   [`WorldMapListener`] trait.
//! - [`manager`] -- [`ExpeditionManager`], the per-session orchestrator.
//! - [`persistence`] -- [`SaveSlots`] trait with file and in-memory backends.
//! - [`placement`] -- World-space positions to grid cells.
//! - [`planning`] -- [`RoutePlanner`]: area selection and preview routes.
//!
//! [`Debouncer`]: debounce::Debouncer
//! [`MonotonicClock`]: debounce::MonotonicClock
//! [`WorldMapEvent`]: events::WorldMapEvent
//! [`WorldMapListener`]: events::WorldMapListener
//! [`ExpeditionManager`]: manager::ExpeditionManager
//! [`SaveSlots`]: persistence::SaveSlots
//! [`RoutePlanner`]: planning::RoutePlanner

pub mod config;
pub mod cost;
pub mod debounce;
pub mod events;
pub mod manager;
pub mod persistence;
pub mod placement;
pub mod planning;
