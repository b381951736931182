//! The platform surface interface and the render payload.
//!
//! The core is protocol-agnostic: everything a chat platform must provide is
//! the [`GameSurface`] delegate. An adapter implements it against real
//! platform components; tests implement it in memory.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use specter_core::catalog::GHOSTS;
use specter_core::evidence::{Evidence, EvidenceState, ObservationSet};
use specter_core::ids::UserId;
use specter_engine::possible_ghosts;

/// Error from a surface dispatch.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The platform rejected or dropped the dispatch.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// The surface no longer exists on the platform side.
    #[error("surface gone")]
    Gone,
}

/// External rendering delegate for one session.
///
/// Implementations must be cheap to call concurrently; the controller is the
/// only caller and serializes calls per session.
#[async_trait]
pub trait GameSurface: Send + Sync {
    /// Whether the platform allows rendering into the target surface at all.
    /// Checked once, before any resource is acquired.
    async fn can_render(&self) -> bool;

    /// Replace the displayed state with `view`.
    async fn render(&self, view: &SessionView) -> Result<(), SurfaceError>;

    /// Deliver a short notice to one actor, outside the rendered surface.
    async fn notify(&self, user: &UserId, message: &str, ephemeral: bool)
    -> Result<(), SurfaceError>;

    /// Remove the rendered surface. Best-effort: callers ignore failures.
    async fn delete_surface(&self) -> Result<(), SurfaceError>;
}

/// Snapshot handed to [`GameSurface::render`] after every accepted mutation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Names still consistent with the observations, in catalog order.
    pub candidates: Vec<String>,
    /// Explicit marker for the empty candidate list.
    pub no_matches: bool,
    /// Current state of every evidence kind, in journal order.
    pub evidence: Vec<EvidenceView>,
    /// Current evidence limit.
    pub limit: u8,
}

/// One evidence row of the rendered state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceView {
    /// Evidence kind.
    pub evidence: Evidence,
    /// Human-readable label.
    pub label: &'static str,
    /// Current observation state.
    pub state: EvidenceState,
}

impl SessionView {
    /// Compute the view for an observation record against the full catalog.
    #[must_use]
    pub fn from_observation(observation: &ObservationSet) -> Self {
        let candidates: Vec<String> = possible_ghosts(observation, &GHOSTS)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let evidence = Evidence::ALL
            .into_iter()
            .map(|e| EvidenceView {
                evidence: e,
                label: e.display_name(),
                state: observation.state(e),
            })
            .collect();
        Self {
            no_matches: candidates.is_empty(),
            candidates,
            evidence,
            limit: observation.limit(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
