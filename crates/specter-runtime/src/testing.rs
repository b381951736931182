//! In-memory [`GameSurface`] double for tests and adapter development.
//!
//! Records every dispatch and lets tests script failures. No platform I/O.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use specter_core::ids::UserId;

use crate::surface::{GameSurface, SessionView, SurfaceError};

/// One recorded denial/notice dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedNotice {
    /// Target user.
    pub user: UserId,
    /// Message text.
    pub message: String,
    /// Ephemeral hint.
    pub ephemeral: bool,
}

/// Recording surface: every call is stored, failures are scriptable.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    deny_capability: AtomicBool,
    fail_renders: AtomicBool,
    fail_deletes: AtomicBool,
    renders: Mutex<Vec<SessionView>>,
    notices: Mutex<Vec<RecordedNotice>>,
    deletes: AtomicUsize,
}

impl RecordingSurface {
    /// Fresh surface that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the capability check report `false`.
    pub fn deny_capability(&self) {
        self.deny_capability.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent render dispatch fail.
    pub fn fail_renders(&self) {
        self.fail_renders.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent delete dispatch fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Number of successful render dispatches.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.lock().len()
    }

    /// The most recently rendered view.
    #[must_use]
    pub fn last_render(&self) -> Option<SessionView> {
        self.renders.lock().last().cloned()
    }

    /// All recorded notices.
    #[must_use]
    pub fn notices(&self) -> Vec<RecordedNotice> {
        self.notices.lock().clone()
    }

    /// Number of delete attempts (successful or not).
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameSurface for RecordingSurface {
    async fn can_render(&self) -> bool {
        !self.deny_capability.load(Ordering::SeqCst)
    }

    async fn render(&self, view: &SessionView) -> Result<(), SurfaceError> {
        if self.fail_renders.load(Ordering::SeqCst) {
            return Err(SurfaceError::Gone);
        }
        self.renders.lock().push(view.clone());
        Ok(())
    }

    async fn notify(
        &self,
        user: &UserId,
        message: &str,
        ephemeral: bool,
    ) -> Result<(), SurfaceError> {
        self.notices.lock().push(RecordedNotice {
            user: user.clone(),
            message: message.to_owned(),
            ephemeral,
        });
        Ok(())
    }

    async fn delete_surface(&self) -> Result<(), SurfaceError> {
        let _ = self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SurfaceError::Dispatch("delete rejected".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specter_core::evidence::ObservationSet;

    #[tokio::test]
    async fn records_renders_and_notices() {
        let surface = RecordingSurface::new();
        assert!(surface.can_render().await);

        let view = SessionView::from_observation(&ObservationSet::new());
        surface.render(&view).await.unwrap();
        assert_eq!(surface.render_count(), 1);
        assert_eq!(surface.last_render(), Some(view));

        surface
            .notify(&UserId::from("u1"), "hello", true)
            .await
            .unwrap();
        let notices = surface.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].ephemeral);
    }

    #[tokio::test]
    async fn scripted_failures() {
        let surface = RecordingSurface::new();
        surface.deny_capability();
        assert!(!surface.can_render().await);

        surface.fail_renders();
        let view = SessionView::from_observation(&ObservationSet::new());
        assert!(surface.render(&view).await.is_err());
        assert_eq!(surface.render_count(), 0);

        surface.fail_deletes();
        assert!(surface.delete_surface().await.is_err());
        assert_eq!(surface.delete_count(), 1);
    }
}
