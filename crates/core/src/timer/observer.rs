//! Emission observers

/// Receives one session's emissions.
///
/// Calls are serialized per session: `on_emission` sees strictly
/// increasing sequence numbers starting at 0, and `on_complete` (one-shot
/// schedules only) is always the final call. Callbacks run inline on the
/// runtime thread driving the session, so they should return promptly; a
/// slow observer delays only its own session.
///
/// Cancelling the session from inside a callback is supported.
pub trait TimerObserver: Send + 'static {
    /// Called for each delivered emission.
    fn on_emission(&mut self, sequence: u64);

    /// Called once, after the single emission of a one-shot schedule.
    /// Repeating sessions run until cancelled and never complete.
    fn on_complete(&mut self) {}
}

impl<F> TimerObserver for F
where
    F: FnMut(u64) + Send + 'static,
{
    fn on_emission(&mut self, sequence: u64) {
        self(sequence);
    }
}

/// Pairs an emission closure with a completion closure.
pub(crate) struct CallbackObserver<N, C> {
    pub(crate) on_next: N,
    pub(crate) on_complete: Option<C>,
}

impl<N, C> TimerObserver for CallbackObserver<N, C>
where
    N: FnMut(u64) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    fn on_emission(&mut self, sequence: u64) {
        (self.on_next)(sequence);
    }

    fn on_complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}
