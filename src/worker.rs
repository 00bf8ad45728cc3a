//! src/worker.rs
//!
//! One worker drives one logical fetch at a time, cooperating with the
//! frontier through three capabilities (`get_url`, `report`, `admit`) that
//! the engine implements. The source hands workers three closures that
//! close over engine state directly; here those three capabilities are an
//! interface (`FrontierHandle`) the worker holds by reference -- plain
//! dependency injection in place of shared mutable capture.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::extract::extract_urls;
use crate::fetcher;
use crate::status::{WorkerState, WorkerStatus};

/// The three things a worker needs from its engine, without needing to see
/// the engine's internals (frontier, mutexes, event channel).
pub trait FrontierHandle: Send + Sync {
    /// Pop the next pending URL, or `None` if the frontier has nothing
    /// waiting right now.
    fn get_url(&self) -> Option<String>;
    /// Publish a status transition for `url`.
    fn report(&self, url: String, status: WorkerStatus);
    /// Attempt to add a newly discovered URL to the frontier.
    fn admit(&self, url: String);
}

/// Shared, engine-owned handle a worker polls to learn its commanded state.
/// One instance per worker; the engine flips `state` on Pause/Resume/Stop
/// and wakes every worker (via the shared `idle` notify on `Worker`) so the
/// change is noticed promptly instead of only at the next backstop tick.
pub struct WorkerControl {
    state: AtomicU8,
}

impl WorkerControl {
    pub fn new() -> Arc<Self> {
        Arc::new(WorkerControl {
            state: AtomicU8::new(WorkerState::Running as u8),
        })
    }

    pub fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }
}

/// Upper bound on how long an idle or paused worker sleeps between
/// re-checks when it has not been explicitly woken. Bounds the classic
/// `Notify` race (a wake-up fires a moment before the waiter subscribes)
/// so a worker can never stall past this interval.
const IDLE_BACKSTOP: Duration = Duration::from_millis(200);

pub struct Worker {
    pub id: usize,
    pub needle: String,
    pub client: Client,
    pub timeout: Duration,
    pub control: Arc<WorkerControl>,
    /// Shared across every worker and the engine: signaled on `admit`
    /// (new work may exist) and on every Pause/Resume/Stop transition (a
    /// commanded-state change may exist), so an idle worker blocks on a
    /// condition variable instead of busy-polling.
    pub idle: Arc<Notify>,
    pub handle: Arc<dyn FrontierHandle>,
}

impl Worker {
    /// Drive the fetch/scan/extract/report loop until `Stopped` is
    /// observed. Never panics on a per-URL failure: every fetch outcome,
    /// good or bad, is reported and the loop continues.
    pub async fn run(self) {
        loop {
            match self.control.state() {
                WorkerState::Stopped => {
                    debug!(worker = self.id, "worker stopping");
                    break;
                }
                WorkerState::Paused => {
                    trace!(worker = self.id, "worker paused, waiting");
                    self.wait().await;
                    continue;
                }
                WorkerState::Running => {}
            }

            match self.handle.get_url() {
                Some(url) => self.process(url).await,
                None => {
                    trace!(worker = self.id, "frontier empty, waiting");
                    self.wait().await;
                }
            }
        }
    }

    async fn wait(&self) {
        let _ = tokio::time::timeout(IDLE_BACKSTOP, self.idle.notified()).await;
    }

    async fn process(&self, url: String) {
        self.handle.report(url.clone(), WorkerStatus::Process);

        match fetcher::fetch(&self.client, &url, self.timeout).await {
            Ok(body) => {
                if body.contains(&self.needle) {
                    self.handle.report(url, WorkerStatus::Found);
                } else {
                    for link in extract_urls(&body) {
                        self.handle.admit(link);
                    }
                    self.handle.report(url, WorkerStatus::NotFound);
                }
            }
            Err(status) => {
                self.handle.report(url, status);
            }
        }
    }
}
