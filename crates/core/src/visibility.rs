//! Debounced visibility tracking
//!
//! Converts a raw, possibly noisy hidden/visible signal pushed in by the
//! host into a committed activity state with asymmetric latency:
//!
//! - a transition to **hidden** is committed only after the raw signal has
//!   held steady for [`HIDDEN_DEBOUNCE_MS`], so brief tab-switch flicker
//!   never reaches dependent timers;
//! - a transition to **visible** is committed immediately.
//!
//! Committed transitions are broadcast synchronously, in commit order, to
//! listeners registered with [`VisibilityTracker::on_transition`]. A
//! listener registered after a commit does not see it retroactively, and
//! no commit is delivered twice. Unsubscribing deactivates a listener
//! synchronously; its registry entry (and anything its callback captured)
//! is released at the next raw signal, registration, or commit.
//!
//! The tracker is cheap to clone; all clones share the same state. One
//! tracker corresponds to one host context (one window, one agent, one
//! embedder surface), and is handed to every timer that should follow it.
//!
//! Raw signals and broadcasts are serialized against each other. Listener
//! callbacks run inside the broadcast and must not call
//! [`VisibilityTracker::on_raw_signal`] reentrantly; push host signals
//! from the event source, not from inside a callback.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use cadence_domain::constants::HIDDEN_DEBOUNCE_MS;

/// Shared, debounced hidden/visible state for one host context.
#[derive(Clone)]
pub struct VisibilityTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    /// Committed state; readable lock-free from any thread.
    hidden: AtomicBool,
    debounce: Mutex<DebounceState>,
    /// Listeners that have been merged into the broadcast list.
    listeners: Mutex<Vec<TransitionListener>>,
    /// Listeners registered since the last broadcast; merged (in order)
    /// before the next one so registration never contends with delivery.
    pending_listeners: Mutex<Vec<TransitionListener>>,
    shutdown: CancellationToken,
    next_listener_id: AtomicU64,
}

struct DebounceState {
    /// Cancellation handle for the single pending hidden commit, if any.
    pending: Option<CancellationToken>,
    /// Bumped on every arm and cancel; a commit delay whose generation no
    /// longer matches fires into nothing.
    generation: u64,
}

struct TransitionListener {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Box<dyn Fn(bool) + Send>,
}

impl VisibilityTracker {
    /// Creates a tracker whose committed state starts visible.
    pub fn new() -> Self {
        Self::with_initial_state(false)
    }

    /// Creates a tracker seeded from a synchronous host query, for hosts
    /// that can report their current state at bootstrap.
    pub fn with_initial_state(hidden: bool) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                hidden: AtomicBool::new(hidden),
                debounce: Mutex::new(DebounceState {
                    pending: None,
                    generation: 0,
                }),
                listeners: Mutex::new(Vec::new()),
                pending_listeners: Mutex::new(Vec::new()),
                shutdown: CancellationToken::new(),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the committed state. A pending, uncommitted hidden
    /// transition is not reflected here.
    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.load(Ordering::Acquire)
    }

    /// Feeds one raw signal from the host.
    ///
    /// - A signal matching the committed state cancels any pending hidden
    ///   commit and changes nothing else.
    /// - A raw visible signal commits (and broadcasts) immediately.
    /// - A raw hidden signal arms a commit for [`HIDDEN_DEBOUNCE_MS`]; if
    ///   one is already pending the window is not extended.
    ///
    /// Every raw signal, matching or not, sweeps unsubscribed listeners
    /// out of the registry.
    ///
    /// Must not be called from inside a transition listener or timer
    /// observer callback; signals are host events, not callback results.
    pub fn on_raw_signal(&self, raw_hidden: bool) {
        let mut debounce = self.inner.debounce.lock();
        self.inner.sweep_inactive();
        let committed = self.inner.hidden.load(Ordering::Acquire);
        if raw_hidden == committed {
            // Matches committed state; any in-flight debounce is moot.
            TrackerInner::cancel_pending(&mut debounce);
        } else if !raw_hidden {
            // Activity returned: commit immediately.
            TrackerInner::cancel_pending(&mut debounce);
            self.inner.commit(false);
        } else if debounce.pending.is_none() {
            self.arm_hidden_commit(&mut debounce);
        }
    }

    /// Registers a listener for committed transitions.
    ///
    /// The callback receives the new committed state (`true` = hidden). It
    /// runs synchronously inside the commit, so it should return quickly
    /// and must not feed raw signals back into the tracker.
    pub fn on_transition(
        &self,
        callback: impl Fn(bool) + Send + 'static,
    ) -> TransitionSubscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        {
            let mut pending = self.inner.pending_listeners.lock();
            TrackerInner::retain_active(&mut pending);
            pending.push(TransitionListener {
                id,
                active: Arc::clone(&active),
                callback: Box::new(callback),
            });
        }
        trace!(listener = id, "transition listener registered");
        TransitionSubscription {
            active,
            detached: false,
        }
    }

    fn arm_hidden_commit(&self, debounce: &mut DebounceState) {
        debounce.generation += 1;
        let generation = debounce.generation;
        let token = self.inner.shutdown.child_token();
        debounce.pending = Some(token.clone());
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep(Duration::from_millis(HIDDEN_DEBOUNCE_MS)) => {
                    inner.commit_hidden(generation);
                }
            }
        });
        trace!(generation, "hidden commit armed");
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VisibilityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityTracker")
            .field("hidden", &self.is_hidden())
            .finish_non_exhaustive()
    }
}

impl TrackerInner {
    fn cancel_pending(debounce: &mut DebounceState) {
        if let Some(pending) = debounce.pending.take() {
            pending.cancel();
            debounce.generation += 1;
            trace!("pending hidden commit cancelled");
        }
    }

    fn retain_active(listeners: &mut Vec<TransitionListener>) {
        listeners.retain(|listener| {
            let active = listener.active.load(Ordering::Acquire);
            if !active {
                trace!(listener = listener.id, "transition listener removed");
            }
            active
        });
    }

    // Callers hold the debounce lock, keeping sweeps ordered against
    // commits.
    fn sweep_inactive(&self) {
        Self::retain_active(&mut self.listeners.lock());
        Self::retain_active(&mut self.pending_listeners.lock());
    }

    fn commit_hidden(&self, generation: u64) {
        let mut debounce = self.debounce.lock();
        if debounce.generation != generation {
            // Cancelled while the delay callback was in flight.
            return;
        }
        debounce.pending = None;
        self.commit(true);
    }

    // Callers hold the debounce lock; that keeps commits and their
    // broadcasts in commit order.
    fn commit(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::Release);
        debug!(hidden, "visibility transition committed");
        let mut listeners = self.listeners.lock();
        {
            let mut pending = self.pending_listeners.lock();
            listeners.append(&mut pending);
        }
        Self::retain_active(&mut listeners);
        for listener in listeners.iter() {
            (listener.callback)(hidden);
        }
    }
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Handle for a registered transition listener.
///
/// Dropping the handle unsubscribes the listener unless it has been
/// [`detach`](TransitionSubscription::detach)ed.
#[derive(Debug)]
#[must_use = "dropping a transition subscription unsubscribes its listener"]
pub struct TransitionSubscription {
    active: Arc<AtomicBool>,
    detached: bool,
}

impl TransitionSubscription {
    /// Stops delivery to this listener. Synchronous and idempotent, and
    /// safe to call from inside the listener's own callback. The registry
    /// entry itself is swept at the tracker's next raw signal,
    /// registration, or commit.
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Keeps the listener registered for the tracker's lifetime.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for TransitionSubscription {
    fn drop(&mut self) {
        if !self.detached {
            self.active.store(false, Ordering::Release);
        }
    }
}
