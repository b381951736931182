//! # specter-core
//!
//! Foundation types for the Specter deduction assistant.
//!
//! This crate provides the shared vocabulary the other Specter crates depend
//! on:
//!
//! - **Branded IDs**: [`ids::UserId`], [`ids::SessionId`] as newtypes
//! - **Evidence**: [`evidence::Evidence`] enum, [`evidence::EvidenceState`]
//!   tri-state, and the per-session [`evidence::ObservationSet`]
//! - **Catalog**: [`catalog::GhostDefinition`] and the static [`catalog::GHOSTS`]
//!   table with guaranteed/fake evidence markers
//! - **Errors**: [`errors::CoreError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] tracing bootstrap
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other specter crates.

#![deny(unsafe_code)]

pub mod catalog;
pub mod errors;
pub mod evidence;
pub mod ids;
pub mod logging;

pub use catalog::{GHOSTS, GhostDefinition, ghost_by_name};
pub use errors::CoreError;
pub use evidence::{Evidence, EvidenceState, ObservationSet};
pub use ids::{SessionId, UserId};
