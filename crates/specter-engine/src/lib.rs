//! # specter-engine
//!
//! Pure deduction over the ghost catalog: given the current observation
//! record, compute exactly which catalog entries remain logically possible.
//!
//! The engine is a function, not a service. It holds no state, performs no
//! I/O, and is deterministic for identical inputs; the session controller
//! re-runs it after every accepted mutation.

#![deny(unsafe_code)]

pub mod deduction;

pub use deduction::{is_possible, possible_ghosts};
