//! Session handles

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::timer::session::Session;

/// Handle to one running timer session.
///
/// Dropping the handle cancels the session unless it has been
/// [`detach`](TimerSubscription::detach)ed.
#[must_use = "dropping a timer subscription cancels its session"]
pub struct TimerSubscription {
    session: Arc<Session>,
    detached: bool,
}

impl TimerSubscription {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            detached: false,
        }
    }

    /// Cancels the session: the armed delay is retired, the tracker
    /// registration is dropped, and no new deliveries begin. A trailing
    /// delivery that was pending at this point is discarded.
    ///
    /// Synchronous and idempotent, and safe to call from inside the
    /// session's own observer. A delivery already in progress on another
    /// runtime thread may still finish; use
    /// [`shutdown`](TimerSubscription::shutdown) when a hard barrier is
    /// required.
    pub fn cancel(&self) {
        self.session.cancel_session();
    }

    /// True once the session has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.session.cancel.is_cancelled()
    }

    /// Lets the session keep running without a handle, for the lifetime
    /// of its tracker and runtime.
    pub fn detach(mut self) {
        debug!(session = self.session.id, "session detached");
        self.detached = true;
    }

    /// Cancels the session and waits until no observer callback can run
    /// afterwards: drains an in-flight delivery and retires the armed
    /// delay task.
    pub async fn shutdown(mut self) {
        self.detached = true;
        self.session.cancel_session();
        if let Some(task) = self.session.take_armed_task() {
            let _ = task.await;
        }
    }
}

impl fmt::Debug for TimerSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerSubscription")
            .field("session", &self.session.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Drop for TimerSubscription {
    fn drop(&mut self) {
        if self.detached || self.is_cancelled() || self.session.is_completed() {
            return;
        }
        warn!(
            session = self.session.id,
            "timer subscription dropped while running; cancelling session"
        );
        self.session.cancel_session();
    }
}
