//! Runtime error types.

use specter_core::CoreError;
use specter_core::ids::UserId;

use crate::surface::SurfaceError;

/// Errors that can occur while driving a deduction session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The actor is not on the session's invite list.
    #[error("Permission denied: {actor} is not part of this hunt")]
    PermissionDenied {
        /// The rejected actor.
        actor: UserId,
    },

    /// The platform cannot render into the target surface at all.
    #[error("Permission denied: cannot render to this surface")]
    MissingCapability,

    /// An out-of-range evidence limit was rejected at the boundary.
    #[error("{0}")]
    InvalidLimit(#[from] CoreError),

    /// A render dispatch failed; the session terminates.
    #[error("Render dispatch failed: {0}")]
    Render(#[from] SurfaceError),

    /// An event reached the session before initialization completed.
    #[error("Session state used before initialization completed")]
    StateUninitialized,

    /// The session has already terminated.
    #[error("Session terminated")]
    Terminated,
}

impl SessionError {
    /// Whether the session survives this error (user can simply retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } | Self::InvalidLimit(_) => true,
            Self::MissingCapability
            | Self::Render(_)
            | Self::StateUninitialized
            | Self::Terminated => false,
        }
    }

    /// Error category string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } | Self::MissingCapability => "permission_denied",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::Render(_) => "render_failed",
            Self::StateUninitialized => "state_uninitialized",
            Self::Terminated => "terminated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_display_names_the_actor() {
        let err = SessionError::PermissionDenied {
            actor: UserId::from("user-7"),
        };
        assert_eq!(
            err.to_string(),
            "Permission denied: user-7 is not part of this hunt"
        );
    }

    #[test]
    fn invalid_limit_wraps_core_error() {
        let err = SessionError::from(CoreError::InvalidEvidenceLimit(9));
        assert_eq!(err.to_string(), "Invalid evidence limit: 9 (expected 1-3)");
        assert_eq!(err.category(), "invalid_limit");
    }

    #[test]
    fn recoverable_classification() {
        assert!(
            SessionError::PermissionDenied {
                actor: UserId::from("u")
            }
            .is_recoverable()
        );
        assert!(SessionError::from(CoreError::InvalidEvidenceLimit(0)).is_recoverable());
        assert!(!SessionError::MissingCapability.is_recoverable());
        assert!(!SessionError::StateUninitialized.is_recoverable());
        assert!(!SessionError::Terminated.is_recoverable());
        assert!(!SessionError::from(SurfaceError::Gone).is_recoverable());
    }

    #[test]
    fn categories() {
        assert_eq!(SessionError::MissingCapability.category(), "permission_denied");
        assert_eq!(
            SessionError::from(SurfaceError::Dispatch("boom".into())).category(),
            "render_failed"
        );
        assert_eq!(SessionError::Terminated.category(), "terminated");
    }
}
