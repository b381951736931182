//! # specter-runtime
//!
//! The session half of Specter: a permission-scoped, idle-expiring,
//! single-consumer controller around the deduction engine.
//!
//! - [`session::Session`] — the synchronous state machine (allow-list,
//!   observation record, lifecycle) with one transition function
//! - [`controller::launch_session`] — spawns the owning task: event channel,
//!   idle deadline, cancellation, and the guaranteed cleanup tail
//! - [`surface::GameSurface`] — the narrow delegate a platform adapter
//!   implements (capability check, render, notify, delete)
//! - [`testing::RecordingSurface`] — in-memory surface double
//!
//! The chat gateway, command registration, and visual component rendering
//! live outside this crate, behind [`surface::GameSurface`].

#![deny(unsafe_code)]

pub mod controller;
pub mod errors;
pub mod session;
pub mod surface;
pub mod testing;

pub use controller::{LaunchOptions, SessionConfig, SessionHandle, launch_session};
pub use errors::SessionError;
pub use session::{Lifecycle, Session, SessionEvent};
pub use surface::{EvidenceView, GameSurface, SessionView, SurfaceError};
