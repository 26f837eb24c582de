//! Per-session scheduling state machine
//!
//! Each subscription owns one [`Session`]: a counter, a throttle gate,
//! and at most one armed delay task. Two trigger sources feed the
//! machine, the armed delay elapsing and a committed hidden-to-visible
//! transition, and every trigger passes through the gate before it may
//! become an emission. Deliveries then re-arm the delay from the
//! committed visibility state.
//!
//! All transitions run under the session's state lock, which is what
//! gives the per-session ordering guarantee: emissions are delivered in
//! counter order and are never concurrent with each other. Observer
//! callbacks run inside that lock; cancellation stays lock-free so an
//! observer can cancel its own session.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use cadence_domain::{EffectiveSchedule, ScheduleMode};

use crate::timer::gate::{GateDecision, ThrottleGate};
use crate::timer::observer::TimerObserver;
use crate::timer::subscription::TimerSubscription;
use crate::visibility::{TransitionSubscription, VisibilityTracker};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) struct Session {
    pub(crate) id: u64,
    /// Root token for the session; armed delays run on child tokens, so
    /// one cancel retires everything.
    pub(crate) cancel: CancellationToken,
    schedule: EffectiveSchedule,
    tracker: VisibilityTracker,
    /// Registration for hidden→visible triggers; repeating sessions only.
    resume_listener: OnceLock<TransitionSubscription>,
    /// Set once a one-shot has delivered; readable lock-free so the
    /// subscription handle can inspect it from any context.
    completed: AtomicBool,
    state: Mutex<SessionState>,
    weak_self: Weak<Session>,
}

struct SessionState {
    observer: Box<dyn TimerObserver>,
    counter: u64,
    gate: ThrottleGate,
    armed: Option<ArmedDelay>,
    /// Bumped on every arm; an expiry whose generation no longer matches
    /// the armed slot fires into nothing.
    next_generation: u64,
}

struct ArmedDelay {
    generation: u64,
    deadline: Instant,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl Session {
    /// Starts an independent session and returns its handle.
    pub(crate) fn start(
        schedule: EffectiveSchedule,
        tracker: VisibilityTracker,
        observer: Box<dyn TimerObserver>,
    ) -> TimerSubscription {
        let interval = match schedule.mode {
            ScheduleMode::OneShot => Duration::ZERO,
            ScheduleMode::Repeating { interval, .. } => interval,
        };
        let session = Arc::new_cyclic(|weak| Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            cancel: CancellationToken::new(),
            schedule,
            tracker,
            resume_listener: OnceLock::new(),
            completed: AtomicBool::new(false),
            state: Mutex::new(SessionState {
                observer,
                counter: 0,
                gate: ThrottleGate::new(interval),
                armed: None,
                next_generation: 0,
            }),
            weak_self: weak.clone(),
        });

        {
            let mut state = session.state.lock();
            if !schedule.is_one_shot() {
                // The tracker entry holds the session alive until it is
                // swept after cancellation.
                let resume = Arc::clone(&session);
                let listener = session.tracker.on_transition(move |hidden| {
                    if !hidden {
                        resume.on_activity_resumed();
                    }
                });
                let _ = session.resume_listener.set(listener);
            }
            let due = Instant::now() + schedule.due_time;
            session.arm(&mut state, due);
        }
        debug!(session = session.id, ?schedule, "session started");

        TimerSubscription::new(session)
    }

    /// Synchronous, idempotent, lock-free cancellation.
    pub(crate) fn cancel_session(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        if let Some(listener) = self.resume_listener.get() {
            listener.unsubscribe();
        }
        debug!(session = self.id, "session cancelled");
    }

    /// True once a one-shot session has delivered its emission. Lock-free,
    /// so handles may call this from inside an observer callback.
    pub(crate) fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    /// Retires the armed delay task for awaiting. Acquiring the state
    /// lock here also drains any delivery still in progress.
    pub(crate) fn take_armed_task(&self) -> Option<JoinHandle<()>> {
        let mut state = self.state.lock();
        state.armed.take().map(|armed| armed.task)
    }

    fn on_delay_elapsed(&self, generation: u64) {
        if self.cancel.is_cancelled() || self.is_completed() {
            return;
        }
        let mut state = self.state.lock();
        if state.armed.as_ref().map(|armed| armed.generation) != Some(generation) {
            // Superseded by a later arm while this expiry was in flight.
            return;
        }
        state.armed = None;
        self.process_trigger(&mut state, Instant::now());
    }

    fn on_activity_resumed(&self) {
        if self.cancel.is_cancelled() || self.is_completed() {
            return;
        }
        let mut state = self.state.lock();
        trace!(session = self.id, "activity resumed");
        self.process_trigger(&mut state, Instant::now());
    }

    fn process_trigger(&self, state: &mut SessionState, now: Instant) {
        match self.schedule.mode {
            ScheduleMode::OneShot => self.deliver(state, now),
            ScheduleMode::Repeating { .. } => match state.gate.on_trigger(now) {
                GateDecision::Deliver => self.deliver(state, now),
                GateDecision::Defer { boundary } => {
                    // Re-point the single delay at the window boundary,
                    // unless it is already there.
                    if state.armed.as_ref().map(|armed| armed.deadline) != Some(boundary) {
                        trace!(session = self.id, "trigger deferred to window boundary");
                        self.arm(state, boundary);
                    }
                }
            },
        }
    }

    fn deliver(&self, state: &mut SessionState, now: Instant) {
        if self.cancel.is_cancelled() {
            return;
        }
        let sequence = state.counter;
        state.counter += 1;
        trace!(session = self.id, sequence, "emission delivered");
        state.observer.on_emission(sequence);
        if self.cancel.is_cancelled() {
            // Cancelled from inside the observer: stop here, without
            // completing and without re-arming.
            self.disarm(state);
            return;
        }
        match self.schedule.mode {
            ScheduleMode::OneShot => {
                self.completed.store(true, Ordering::Release);
                self.disarm(state);
                debug!(session = self.id, "one-shot session completed");
                state.observer.on_complete();
            }
            ScheduleMode::Repeating {
                interval,
                inactive_interval,
            } => {
                let next = if self.tracker.is_hidden() {
                    inactive_interval
                } else {
                    interval
                };
                if next.is_zero() {
                    // Dormant: hidden with a zero inactive cadence. The
                    // next resume trigger restarts the timer.
                    self.disarm(state);
                } else {
                    self.arm(state, now + next);
                }
            }
        }
    }

    /// Arms the internal delay at an absolute deadline, cancelling any
    /// stale delay first so at most one is ever armed.
    fn arm(&self, state: &mut SessionState, deadline: Instant) {
        self.disarm(state);
        let Some(session) = self.weak_self.upgrade() else {
            return;
        };
        state.next_generation += 1;
        let generation = state.next_generation;
        let token = self.cancel.child_token();
        let delay_token = token.clone();
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = delay_token.cancelled() => {}
                _ = sleep_until(deadline) => session.on_delay_elapsed(generation),
            }
        });
        trace!(session = self.id, generation, "delay armed");
        state.armed = Some(ArmedDelay {
            generation,
            deadline,
            token,
            task,
        });
    }

    fn disarm(&self, state: &mut SessionState) {
        if let Some(stale) = state.armed.take() {
            stale.token.cancel();
        }
    }
}
