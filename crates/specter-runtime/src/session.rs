//! Session state machine.
//!
//! [`Session`] is the synchronous heart of a deduction session: the invite
//! list, the observation record, and a lifecycle flag. It consumes
//! [`SessionEvent`]s through a single transition function, [`Session::apply`];
//! the async controller owns the channels and timers around it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use specter_core::evidence::{Evidence, ObservationSet};
use specter_core::ids::{SessionId, UserId};

use crate::errors::SessionError;
use crate::surface::SessionView;

/// One interaction event, as delivered by the platform adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Rotate one evidence through the three-state cycle.
    ToggleEvidence {
        /// Acting user.
        actor: UserId,
        /// Evidence to rotate.
        evidence: Evidence,
    },
    /// Overwrite the difficulty-imposed evidence limit.
    SetEvidenceLimit {
        /// Acting user.
        actor: UserId,
        /// New limit; validated against `1..=3` before any mutation.
        limit: u8,
    },
}

impl SessionEvent {
    /// The user who triggered the event.
    #[must_use]
    pub fn actor(&self) -> &UserId {
        match self {
            Self::ToggleEvidence { actor, .. } | Self::SetEvidenceLimit { actor, .. } => actor,
        }
    }
}

/// Lifecycle of a session. `Terminated` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Asynchronous setup window: capability precheck and initial render.
    Initializing,
    /// Accepting events.
    Active,
    /// Done. No transition out.
    Terminated,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Active => write!(f, "active"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// One independent deduction session.
pub struct Session {
    id: SessionId,
    allowed_users: HashSet<UserId>,
    observation: ObservationSet,
    lifecycle: Lifecycle,
}

impl Session {
    /// Create a session in the `Initializing` state.
    ///
    /// The allow-list is the invoking user plus everyone they invited.
    #[must_use]
    pub fn new(invoking_user: UserId, invited_users: &[UserId]) -> Self {
        let mut allowed_users: HashSet<UserId> = invited_users.iter().cloned().collect();
        let _ = allowed_users.insert(invoking_user);
        Self {
            id: SessionId::new(),
            allowed_users,
            observation: ObservationSet::new(),
            lifecycle: Lifecycle::Initializing,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Read-only view of the observation record.
    #[must_use]
    pub fn observation(&self) -> &ObservationSet {
        &self.observation
    }

    /// Mutable observation access for the owning controller (setup window
    /// only; active sessions mutate through [`Session::apply`]).
    pub(crate) fn observation_mut(&mut self) -> &mut ObservationSet {
        &mut self.observation
    }

    /// Whether the user is on the allow-list.
    #[must_use]
    pub fn is_authorized(&self, user: &UserId) -> bool {
        self.allowed_users.contains(user)
    }

    /// Finish initialization and start accepting events.
    pub fn activate(&mut self) {
        if self.lifecycle == Lifecycle::Initializing {
            self.lifecycle = Lifecycle::Active;
        }
    }

    /// Mark the session terminated. Idempotent; there is no way back.
    pub fn terminate(&mut self) {
        self.lifecycle = Lifecycle::Terminated;
    }

    /// Render snapshot of the current state.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_observation(&self.observation)
    }

    /// Apply one event: authorize, mutate, and return the refreshed view.
    ///
    /// Rejected events (wrong actor, out-of-range limit) leave the
    /// observation record untouched.
    pub fn apply(&mut self, event: &SessionEvent) -> Result<SessionView, SessionError> {
        match self.lifecycle {
            Lifecycle::Initializing => return Err(SessionError::StateUninitialized),
            Lifecycle::Terminated => return Err(SessionError::Terminated),
            Lifecycle::Active => {}
        }

        let actor = event.actor();
        if !self.is_authorized(actor) {
            return Err(SessionError::PermissionDenied {
                actor: actor.clone(),
            });
        }

        match event {
            SessionEvent::ToggleEvidence { evidence, .. } => {
                let state = self.observation.toggle(*evidence);
                debug!(session_id = %self.id, %actor, %evidence, %state, "evidence toggled");
            }
            SessionEvent::SetEvidenceLimit { limit, .. } => {
                self.observation.set_limit(*limit)?;
                debug!(session_id = %self.id, %actor, limit, "evidence limit changed");
            }
        }

        Ok(self.view())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
