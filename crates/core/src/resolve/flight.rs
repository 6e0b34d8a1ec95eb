//! Per-key join-in-flight.
//!
//! The first caller for a key becomes the leader and runs the work; callers
//! arriving while it runs wait for the leader's outcome instead of running
//! the work again. Keys are independent: different ids never wait on each
//! other.
//!
//! A leader that is cancelled, or whose future is dropped, publishes
//! nothing. Its followers then race to become the next leader, so one
//! caller's cancellation never leaks into another caller's result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::Resolved;
use crate::Error;

pub(crate) type Outcome = Result<Resolved, Error>;

struct Entry {
    generation: u64,
    outcome: watch::Receiver<Option<Outcome>>,
}

#[derive(Default)]
struct State {
    next_generation: u64,
    entries: HashMap<String, Entry>,
}

enum Role {
    Leader { generation: u64, tx: watch::Sender<Option<Outcome>> },
    Follower(watch::Receiver<Option<Outcome>>),
}

/// In-flight operations keyed by id.
#[derive(Default)]
pub(crate) struct Flights {
    state: Mutex<State>,
}

impl Flights {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn join_or_lead(&self, key: &str) -> Role {
        let mut state = self.lock();
        if let Some(entry) = state.entries.get(key) {
            return Role::Follower(entry.outcome.clone());
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        let (tx, rx) = watch::channel(None);
        state.entries.insert(key.to_string(), Entry { generation, outcome: rx });
        Role::Leader { generation, tx }
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.lock().entries.len()
    }

    /// Run `work` for `key`, or wait for the run already in flight.
    ///
    /// Returns the outcome and whether this caller was the one that ran it.
    pub(crate) async fn run<F, Fut>(&self, key: &str, cancel: &CancellationToken, work: F) -> (Outcome, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        loop {
            let mut rx = match self.join_or_lead(key) {
                Role::Leader { generation, tx } => {
                    let _guard = Landing { flights: self, key, generation };
                    let outcome = work().await;
                    if !matches!(outcome, Err(Error::Cancelled(_))) {
                        tx.send_replace(Some(outcome.clone()));
                    }
                    return (outcome, true);
                }
                Role::Follower(rx) => rx,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return (Err(Error::Cancelled(format!("{key}: waiting for in-flight resolve"))), false);
                }
                landed = rx.wait_for(Option::is_some) => {
                    if let Ok(outcome) = landed
                        && let Some(outcome) = outcome.as_ref()
                    {
                        return (outcome.clone(), false);
                    }
                    tracing::debug!(character = key, "in-flight leader abandoned; retrying");
                }
            }
        }
    }
}

/// Removes the leader's entry when the leader finishes or is dropped.
struct Landing<'a> {
    flights: &'a Flights,
    key: &'a str,
    generation: u64,
}

impl Drop for Landing<'_> {
    fn drop(&mut self) {
        let mut state = self.flights.lock();
        if state.entries.get(self.key).is_some_and(|e| e.generation == self.generation) {
            state.entries.remove(self.key);
        }
    }
}
