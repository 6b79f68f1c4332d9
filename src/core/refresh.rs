//! Single-flight gate for credential refresh.
//!
//! The first caller to [`RefreshGate::enter`] becomes the owner and performs the
//! refresh; callers arriving while it is in flight get a [`Waiter`] that
//! resolves once with the owner's outcome. Flag and queue live under one lock,
//! so clearing the flag and draining the queue can not interleave with a new
//! `enter`.

use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::common::{debug, HttpError};

pub(crate) type Outcome = Result<(), HttpError>;

#[derive(Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

#[derive(Default)]
struct GateState {
    in_flight: bool,
    queue: Vec<oneshot::Sender<Outcome>>,
}

pub(crate) enum Ticket<'a> {
    Owner(OwnerGuard<'a>),
    Waiter(Waiter),
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enter(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.queue.push(tx);
            debug!(queued = state.queue.len(), "Refresh in flight, waiting");
            Ticket::Waiter(Waiter { rx })
        } else {
            state.in_flight = true;
            Ticket::Owner(OwnerGuard {
                gate: self,
                settled: false,
            })
        }
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub(crate) fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    // Clear the flag and hand the outcome to every waiter. Returns how many
    // waiters were released.
    fn settle(&self, outcome: &Outcome) -> usize {
        let mut state = self.lock();
        state.in_flight = false;
        let queue = mem::take(&mut state.queue);
        let released = queue.len();
        for waiter in queue {
            // A dropped receiver means its request was abandoned by the caller.
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the caller that performs the refresh.
///
/// Dropping it unsettled (e.g. the owning future was cancelled) aborts every
/// waiter so the queue never stays populated.
pub(crate) struct OwnerGuard<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl OwnerGuard<'_> {
    pub(crate) fn settle(mut self, outcome: &Outcome) -> usize {
        self.settled = true;
        self.gate.settle(outcome)
    }
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate
                .settle(&Err(HttpError::request("credential refresh was abandoned")));
        }
    }
}

pub(crate) struct Waiter {
    rx: oneshot::Receiver<Outcome>,
}

impl Waiter {
    pub(crate) async fn wait(self) -> Outcome {
        self.rx
            .await
            .unwrap_or_else(|_| Err(HttpError::request("credential refresh was abandoned")))
    }
}
