//! Session controller — the async owner of one session.
//!
//! Each launched session gets a single-consumer task: an mpsc event channel,
//! an idle deadline, and a `CancellationToken`. The task is the only thing
//! that ever touches the session state, which gives the per-session
//! serialization guarantee for free; events for different sessions never
//! contend. Every exit path runs the same cleanup tail exactly once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use specter_core::ids::{SessionId, UserId};
use specter_settings::SessionSettings;

use crate::errors::SessionError;
use crate::session::{Session, SessionEvent};
use crate::surface::GameSurface;

/// Notice shown to actors outside the allow-list.
const DENIAL_NOTICE: &str = "You are not part of this hunt.";

/// Notice shown to the invoker when the surface capability check fails.
const CAPABILITY_NOTICE: &str =
    "I cannot render the journal here. Check my permissions and try again.";

/// Tunables for one session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How long without an accepted event before the session terminates
    /// itself.
    pub idle_timeout: Duration,
    /// Capacity of the interaction event channel.
    pub event_buffer: usize,
    /// Evidence limit a fresh session starts with.
    pub default_evidence_limit: u8,
}

impl SessionConfig {
    /// Build a config from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            idle_timeout: Duration::from_secs(settings.idle_timeout_secs),
            event_buffer: settings.event_buffer,
            default_evidence_limit: settings.default_evidence_limit,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&SessionSettings::default())
    }
}

/// Construction inputs from the triggering command.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
    /// The user who invoked the command.
    pub invoking_user: UserId,
    /// Additional users allowed to interact.
    pub invited_users: Vec<UserId>,
}

/// Why a session task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EndReason {
    /// Idle deadline passed with no accepted event.
    Idle,
    /// Termination requested through the handle.
    Requested,
    /// Every handle was dropped; nothing can send events anymore.
    Detached,
    /// A render dispatch or invariant failure.
    Failed,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Requested => write!(f, "requested"),
            Self::Detached => write!(f, "detached"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Handle to a running session.
///
/// Dropping the last handle detaches the event stream and the session cleans
/// itself up.
#[derive(Debug)]
pub struct SessionHandle {
    session_id: SessionId,
    events: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// The session's identifier.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Deliver one interaction event to the session.
    ///
    /// Events are processed strictly one at a time, in arrival order.
    pub async fn send(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.events
            .send(event)
            .await
            .map_err(|_| SessionError::Terminated)
    }

    /// Request termination. Idempotent; safe to call concurrently with idle
    /// expiry or in-flight events.
    pub fn terminate(&self) {
        self.cancel.cancel();
    }

    /// Whether the session task has fully finished (cleanup included).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session task to finish its cleanup.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            warn!(session_id = %self.session_id, error = %err, "session task join failed");
        }
    }
}

/// Construct and start a session.
///
/// Fails fast (nothing acquired, nothing to clean up) when the capability
/// check says the surface cannot be rendered; the invoker gets an ephemeral
/// denial instead. Otherwise the initial state is rendered, the session goes
/// active, and the idle deadline is armed.
#[instrument(skip_all, fields(invoker = %opts.invoking_user, invited = opts.invited_users.len()))]
pub async fn launch_session(
    opts: LaunchOptions,
    surface: Arc<dyn GameSurface>,
    config: SessionConfig,
) -> Result<SessionHandle, SessionError> {
    let mut session = Session::new(opts.invoking_user.clone(), &opts.invited_users);

    if !surface.can_render().await {
        if let Err(err) = surface
            .notify(&opts.invoking_user, CAPABILITY_NOTICE, true)
            .await
        {
            warn!(error = %err, "capability denial notice failed");
        }
        return Err(SessionError::MissingCapability);
    }

    if config.default_evidence_limit != session.observation().limit() {
        session
            .observation_mut()
            .set_limit(config.default_evidence_limit)?;
    }

    if let Err(err) = surface.render(&session.view()).await {
        // The dispatch may have half-created the surface; try to drop it.
        if let Err(cleanup_err) = surface.delete_surface().await {
            warn!(error = %cleanup_err, "surface cleanup failed (ignored)");
        }
        return Err(SessionError::Render(err));
    }

    session.activate();
    info!(session_id = %session.id(), "session active");

    let session_id = session.id().clone();
    let (events_tx, events_rx) = mpsc::channel(config.event_buffer);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run_session(
        session,
        surface,
        events_rx,
        cancel.clone(),
        config.idle_timeout,
    ));

    Ok(SessionHandle {
        session_id,
        events: events_tx,
        cancel,
        task,
    })
}

/// Outcome of one processed event.
enum Outcome {
    /// State mutated and re-rendered; the idle deadline re-arms.
    Applied,
    /// Rejected at the boundary; state and deadline untouched.
    Rejected,
}

/// The single-consumer session loop.
async fn run_session(
    mut session: Session,
    surface: Arc<dyn GameSurface>,
    mut events: mpsc::Receiver<SessionEvent>,
    cancel: CancellationToken,
    idle_timeout: Duration,
) {
    let mut deadline = Instant::now() + idle_timeout;

    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => break EndReason::Requested,
            () = time::sleep_until(deadline) => break EndReason::Idle,
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    break EndReason::Detached;
                };
                // Termination may have begun while this event sat in the
                // queue; it must be discarded, not applied.
                if cancel.is_cancelled() {
                    break EndReason::Requested;
                }
                match process_event(&mut session, surface.as_ref(), &event).await {
                    Ok(Outcome::Applied) => deadline = Instant::now() + idle_timeout,
                    Ok(Outcome::Rejected) => {}
                    Err(err) => {
                        warn!(
                            session_id = %session.id(),
                            category = err.category(),
                            error = %err,
                            "session failed"
                        );
                        break EndReason::Failed;
                    }
                }
            }
        }
    };

    // Cleanup tail: runs exactly once, on every exit path. The timer and
    // event stream die with the task; surface deletion is best-effort.
    session.terminate();
    if let Err(err) = surface.delete_surface().await {
        warn!(session_id = %session.id(), error = %err, "surface cleanup failed (ignored)");
    }
    info!(session_id = %session.id(), %reason, "session terminated");
}

/// Apply one event and dispatch the outcome.
///
/// Recoverable rejections (unauthorized actor, out-of-range limit) resolve to
/// [`Outcome::Rejected`]; anything else bubbles up and terminates the session.
async fn process_event(
    session: &mut Session,
    surface: &dyn GameSurface,
    event: &SessionEvent,
) -> Result<Outcome, SessionError> {
    match session.apply(event) {
        Ok(view) => {
            surface.render(&view).await?;
            Ok(Outcome::Applied)
        }
        Err(err @ SessionError::PermissionDenied { .. }) => {
            if let Err(notify_err) = surface.notify(event.actor(), DENIAL_NOTICE, true).await {
                warn!(error = %notify_err, "denial notice failed");
            }
            debug!(session_id = %session.id(), actor = %event.actor(), category = err.category(), "event rejected");
            Ok(Outcome::Rejected)
        }
        Err(err @ SessionError::InvalidLimit(_)) => {
            warn!(session_id = %session.id(), error = %err, "event rejected");
            Ok(Outcome::Rejected)
        }
        Err(err) => Err(err),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;
    use assert_matches::assert_matches;
    use specter_core::evidence::Evidence;

    fn opts() -> LaunchOptions {
        LaunchOptions {
            invoking_user: UserId::from("invoker"),
            invited_users: vec![UserId::from("friend")],
        }
    }

    fn config(idle: Duration) -> SessionConfig {
        SessionConfig {
            idle_timeout: idle,
            event_buffer: 16,
            default_evidence_limit: 3,
        }
    }

    fn toggle(actor: &str, evidence: Evidence) -> SessionEvent {
        SessionEvent::ToggleEvidence {
            actor: UserId::from(actor),
            evidence,
        }
    }

    /// Let the session task drain its queue without advancing time.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn default_config_matches_settings_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.event_buffer, 64);
        assert_eq!(config.default_evidence_limit, 3);
    }

    #[tokio::test]
    async fn capability_failure_fails_fast() {
        let surface = Arc::new(RecordingSurface::new());
        surface.deny_capability();

        let err = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap_err();
        assert_matches!(err, SessionError::MissingCapability);

        // Denial notice went to the invoker; nothing rendered, nothing
        // acquired, nothing deleted.
        let notices = surface.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].user.as_str(), "invoker");
        assert!(notices[0].ephemeral);
        assert_eq!(surface.render_count(), 0);
        assert_eq!(surface.delete_count(), 0);
    }

    #[tokio::test]
    async fn launch_renders_initial_state() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        assert_eq!(surface.render_count(), 1);
        let view = surface.last_render().unwrap();
        assert_eq!(view.candidates.len(), 24);
        assert_eq!(view.limit, 3);

        handle.terminate();
        handle.join().await;
    }

    #[tokio::test]
    async fn initial_render_failure_terminates_with_cleanup_attempt() {
        let surface = Arc::new(RecordingSurface::new());
        surface.fail_renders();

        let err = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap_err();
        assert_matches!(err, SessionError::Render(_));
        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test]
    async fn configured_limit_applies_before_first_render() {
        let surface = Arc::new(RecordingSurface::new());
        let cfg = SessionConfig {
            default_evidence_limit: 2,
            ..SessionConfig::default()
        };

        let handle = launch_session(opts(), surface.clone(), cfg).await.unwrap();
        assert_eq!(surface.last_render().unwrap().limit, 2);

        handle.terminate();
        handle.join().await;
    }

    #[tokio::test]
    async fn accepted_event_rerenders() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle
            .send(toggle("friend", Evidence::GhostOrb))
            .await
            .unwrap();
        settle().await;

        assert_eq!(surface.render_count(), 2);
        let view = surface.last_render().unwrap();
        assert!(view.candidates.len() < 24);

        handle.terminate();
        handle.join().await;
    }

    #[tokio::test]
    async fn unauthorized_event_notifies_without_rendering() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle
            .send(toggle("stranger", Evidence::GhostOrb))
            .await
            .unwrap();
        settle().await;

        assert_eq!(surface.render_count(), 1, "no re-render for a denial");
        let notices = surface.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].user.as_str(), "stranger");
        assert_eq!(notices[0].message, DENIAL_NOTICE);

        handle.terminate();
        handle.join().await;
    }

    #[tokio::test]
    async fn invalid_limit_is_rejected_without_rendering() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle
            .send(SessionEvent::SetEvidenceLimit {
                actor: UserId::from("invoker"),
                limit: 9,
            })
            .await
            .unwrap();
        settle().await;

        assert_eq!(surface.render_count(), 1);
        assert!(!handle.is_finished(), "a bad limit is not fatal");

        handle.terminate();
        handle.join().await;
    }

    #[tokio::test]
    async fn render_failure_mid_session_terminates() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        surface.fail_renders();
        handle
            .send(toggle("invoker", Evidence::SpiritBox))
            .await
            .unwrap();
        handle.join().await;

        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_expiry_terminates_exactly_once() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(
            opts(),
            surface.clone(),
            config(Duration::from_secs(5)),
        )
        .await
        .unwrap();

        // No events: paused time auto-advances to the idle deadline.
        handle.join().await;
        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_event_rearms_the_idle_deadline() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(
            opts(),
            surface.clone(),
            config(Duration::from_secs(100)),
        )
        .await
        .unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        handle
            .send(toggle("invoker", Evidence::GhostOrb))
            .await
            .unwrap();
        settle().await;

        // 110s since launch, but only 50s since the accepted event.
        tokio::time::advance(Duration::from_secs(50)).await;
        settle().await;
        assert!(!handle.is_finished());

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert!(handle.is_finished());
        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_event_does_not_rearm_the_idle_deadline() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(
            opts(),
            surface.clone(),
            config(Duration::from_secs(100)),
        )
        .await
        .unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        handle
            .send(toggle("stranger", Evidence::GhostOrb))
            .await
            .unwrap();
        settle().await;

        // 110s since launch with no accepted event: the original deadline
        // stands and the session is gone.
        tokio::time::advance(Duration::from_secs(50)).await;
        settle().await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn terminate_is_idempotent_and_cleans_up_once() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle.terminate();
        handle.terminate();
        handle.join().await;
        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test]
    async fn cleanup_failure_is_swallowed() {
        let surface = Arc::new(RecordingSurface::new());
        surface.fail_deletes();
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle.terminate();
        handle.join().await;
        assert_eq!(surface.delete_count(), 1);
    }

    #[tokio::test]
    async fn send_after_termination_errors() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        handle.terminate();
        settle().await;
        // The loop has exited and dropped the receiver.
        let result = handle.send(toggle("invoker", Evidence::GhostOrb)).await;
        assert_matches!(result, Err(SessionError::Terminated));

        handle.join().await;
        assert_eq!(surface.render_count(), 1, "late event was not applied");
    }

    #[tokio::test]
    async fn dropping_the_handle_detaches_and_cleans_up() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = launch_session(opts(), surface.clone(), SessionConfig::default())
            .await
            .unwrap();

        let task = handle.task;
        drop(handle.events);
        drop(handle.cancel);
        let _ = task.await;
        assert_eq!(surface.delete_count(), 1);
    }
}
