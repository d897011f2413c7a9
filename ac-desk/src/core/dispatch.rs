//! Request dispatch
//!
//! ```text
//! UI thread ── spawn(key, future) ──► tokio task ──► mpsc ──► UiEvents (UI thread)
//!                    │
//!                    └── same key already running? cancel it
//! ```
//!
//! Each request runs as its own task and never blocks the caller. Results
//! come back on one channel with a single receiver, which the UI drains on
//! its own thread. Starting a request with a key that is already in flight
//! supersedes the old one: it is cancelled and its result is never
//! delivered. Nothing is retried.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use shared::types::{ReportId, UserId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identity of a request slot. One in-flight request per key.
///
/// Mutations are keyed by kind and target, so only a repeat of the same
/// action on the same record supersedes a pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Login,
    SubmitReport,
    LoadReports,
    LoadAgents,
    OpenReport,
    AssignReport(ReportId),
    /// Take to work and close: the latest requested status wins.
    ReportStatus(ReportId),
    SaveSolution(ReportId),
    EditReport(ReportId),
    LoadUsers,
    RegisterUser,
    SaveUser(UserId),
    UpdatePassword(UserId),
    DeleteUser(UserId),
    LoadAccessGroups,
}

/// A finished request
#[derive(Debug)]
pub struct UiEvent<T> {
    pub key: RequestKey,
    pub payload: T,
}

struct InFlight {
    generation: u64,
    token: CancellationToken,
}

type InFlightMap = Arc<Mutex<HashMap<RequestKey, InFlight>>>;

fn lock(map: &InFlightMap) -> MutexGuard<'_, HashMap<RequestKey, InFlight>> {
    // Entries are inserted/removed whole; a poisoned map is still consistent.
    map.lock().unwrap_or_else(|e| e.into_inner())
}

/// Spawns requests and routes their results to [`UiEvents`].
pub struct Dispatcher<T> {
    tx: mpsc::UnboundedSender<UiEvent<T>>,
    in_flight: InFlightMap,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            in_flight: self.in_flight.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: Send + 'static> Dispatcher<T> {
    pub fn new() -> (Self, UiEvents<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            tx,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        };
        (dispatcher, UiEvents { rx })
    }

    /// Run `task` in the background, superseding any request with the same key.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, key: RequestKey, task: F) -> JoinHandle<()>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let previous = lock(&self.in_flight).insert(
            key,
            InFlight {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.token.cancel();
            tracing::debug!(?key, "Superseded in-flight request");
        }

        let tx = self.tx.clone();
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(?key, "Request cancelled");
                }
                payload = task => {
                    let current = {
                        let mut map = lock(&in_flight);
                        let ours = map.get(&key).is_some_and(|f| f.generation == generation);
                        if ours {
                            map.remove(&key);
                        }
                        ours
                    };
                    if !current {
                        tracing::debug!(?key, "Dropping result of superseded request");
                    } else if tx.send(UiEvent { key, payload }).is_err() {
                        tracing::debug!(?key, "UI event receiver closed");
                    }
                }
            }
        })
    }

    /// True while a request for `key` is running. The UI uses this to
    /// disable the control that started it.
    pub fn is_in_flight(&self, key: RequestKey) -> bool {
        lock(&self.in_flight).contains_key(&key)
    }

    /// Cancel the request for `key`, if any.
    pub fn cancel(&self, key: RequestKey) -> bool {
        match lock(&self.in_flight).remove(&key) {
            Some(flight) => {
                flight.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything (logout).
    pub fn cancel_all(&self) {
        let drained: Vec<_> = lock(&self.in_flight).drain().collect();
        for (key, flight) in drained {
            flight.token.cancel();
            tracing::debug!(?key, "Request cancelled on reset");
        }
    }
}

/// Single consumer of finished requests
pub struct UiEvents<T> {
    rx: mpsc::UnboundedReceiver<UiEvent<T>>,
}

impl<T> UiEvents<T> {
    /// Wait for the next result.
    pub async fn recv(&mut self) -> Option<UiEvent<T>> {
        self.rx.recv().await
    }

    /// Everything already delivered, without waiting.
    pub fn drain(&mut self) -> Vec<UiEvent<T>> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
