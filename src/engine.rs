//! src/engine.rs
//!
//! Owns the frontier, the worker pool, and the aggregate state machine.
//! Exposes the command surface (`start`/`pause`/`resume`/`stop`/`get_status`)
//! and the event surface (a broadcast channel of `EngineEvent`) that any
//! presentation collaborator -- the CLI binary in this crate, or a future
//! GUI -- subscribes to.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::CrawlError;
use crate::fetcher::DEFAULT_TIMEOUT;
use crate::frontier::Frontier;
use crate::status::{EngineEvent, EngineState, SearchResult, UrlStatus, WorkerState};
use crate::worker::{FrontierHandle, Worker, WorkerControl};

/// Event channel capacity. Generous relative to any realistic `cap`, so a
/// slow subscriber only risks lagging (and finding out via `RecvError::Lagged`)
/// rather than ever blocking a worker.
const EVENT_CHANNEL_CAPACITY: usize = 4096;

struct StatusInner {
    engine_state: EngineState,
    result_emitted: bool,
}

struct WorkerHandle {
    control: Arc<WorkerControl>,
    join: JoinHandle<()>,
}

struct EngineInner {
    frontier: Mutex<Frontier>,
    status: Mutex<StatusInner>,
    workers: Mutex<Vec<WorkerHandle>>,
    /// Lock-free mirror of `status.engine_state` for cheap reads from
    /// `get_url`/`admit`/`report`, which run on every worker's hot path and
    /// should not contend the status mutex just to check "are we stopped".
    state: AtomicU8,
    /// Count of fetches currently in flight (popped from the frontier but
    /// not yet terminally reported), rather than a per-worker
    /// `is_processing` boolean polled on every check: exhaustion is
    /// `in_flight == 0 && frontier.empty()`.
    in_flight: AtomicUsize,
    /// Shared with every spawned `Worker`; signaled whenever a worker might
    /// need to re-check its state (new URL admitted, Pause/Resume/Stop).
    idle: Arc<tokio::sync::Notify>,
    client: Client,
    events: broadcast::Sender<EngineEvent>,
    /// Per-request fetch deadline. Fixed at 5000ms; overridable
    /// only via `Engine::with_timeout`, which tests use to exercise timeout
    /// classification without waiting out the real default.
    timeout: Duration,
}

impl FrontierHandle for EngineInner {
    fn get_url(&self) -> Option<String> {
        // Pop and the in-flight increment must happen as one critical
        // section: if the increment were applied after the lock is
        // released, a concurrent terminal `report` could observe the
        // frontier empty and `in_flight` not yet bumped for this URL and
        // wrongly declare exhaustion.
        let mut frontier = self.frontier.lock().expect("frontier mutex poisoned");
        let url = frontier.pop();
        if url.is_some() {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
        }
        url
    }

    fn report(&self, url: String, status: UrlStatus) {
        if status.is_terminal() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if self.current_state() == EngineState::Stop {
            // Dropped silently: bookkeeping above still applies so the
            // in-flight slot is released, but no event reaches subscribers.
            return;
        }

        let _ = self.events.send(EngineEvent::UrlStatus {
            url,
            status,
        });

        if status == UrlStatus::Found {
            self.emit_result_once(SearchResult::Found);
        } else if status.is_terminal() {
            let frontier_empty = {
                let frontier = self.frontier.lock().expect("frontier mutex poisoned");
                frontier.is_empty()
            };
            if frontier_empty && self.in_flight.load(Ordering::SeqCst) == 0 {
                self.emit_result_once(SearchResult::NotFound);
            }
        }
    }

    fn admit(&self, url: String) {
        if self.current_state() == EngineState::Stop {
            return;
        }
        let admitted = {
            let mut frontier = self.frontier.lock().expect("frontier mutex poisoned");
            frontier.admit(&url)
        };
        if admitted {
            self.idle.notify_waiters();
        }
    }
}

impl EngineInner {
    fn current_state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, new: EngineState) {
        self.state.store(new as u8, Ordering::Release);
        {
            let mut status = self.status.lock().expect("status mutex poisoned");
            status.engine_state = new;
        }
        self.idle.notify_waiters();
    }

    fn emit_result_once(&self, result: SearchResult) {
        let mut status = self.status.lock().expect("status mutex poisoned");
        if status.result_emitted {
            return;
        }
        status.result_emitted = true;
        drop(status);
        let _ = self.events.send(EngineEvent::SearchResult(result));
    }
}

/// The crawl engine. Cheap to clone (an `Arc` wrapper) so the CLI
/// collaborator and any worker tasks can share one instance.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Build a new, stopped engine using the default 5 s per-request
    /// timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a new, stopped engine with a non-default fetch timeout. Not
    /// exposed through the CLI (the fixed timeout is 5000ms); this exists
    /// so tests can exercise timeout classification without waiting 5 real
    /// seconds per case.
    pub fn with_timeout(timeout: Duration) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let inner = EngineInner {
            frontier: Mutex::new(Frontier::new(1)),
            status: Mutex::new(StatusInner {
                engine_state: EngineState::Stop,
                result_emitted: false,
            }),
            workers: Mutex::new(Vec::new()),
            state: AtomicU8::new(EngineState::Stop as u8),
            in_flight: AtomicUsize::new(0),
            idle: Arc::new(tokio::sync::Notify::new()),
            client: Client::new(),
            events,
            timeout,
        };
        Engine {
            inner: Arc::new(inner),
        }
    }

    /// Subscribe to the engine's event stream. Each subscriber gets every
    /// event from the moment it subscribes onward.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// Current engine lifecycle state. Read-only, side-effect free.
    pub fn get_status(&self) -> EngineState {
        self.inner.current_state()
    }

    /// Begin a crawl. Pre: engine must be `Stop`.
    pub fn start(
        &self,
        seed: impl Into<String>,
        n_workers: u16,
        needle: impl Into<String>,
        cap: u32,
    ) -> Result<(), CrawlError> {
        let seed = seed.into();
        let needle = needle.into();

        let current = self.inner.current_state();
        if current != EngineState::Stop {
            return Err(CrawlError::InvalidState {
                action: "start",
                current,
            });
        }
        if n_workers < 1 {
            return Err(CrawlError::InvalidParameter {
                name: "n_workers",
                value: n_workers.to_string(),
            });
        }
        if cap < 1 {
            return Err(CrawlError::InvalidParameter {
                name: "cap",
                value: cap.to_string(),
            });
        }
        if needle.is_empty() {
            return Err(CrawlError::EmptyNeedle);
        }

        {
            let mut frontier = self.inner.frontier.lock().expect("frontier mutex poisoned");
            frontier.reset(cap as usize);
            frontier.admit(&seed);
        }
        self.inner.in_flight.store(0, Ordering::SeqCst);
        {
            let mut status = self.inner.status.lock().expect("status mutex poisoned");
            status.result_emitted = false;
        }
        self.inner.set_state(EngineState::Process);

        let timeout = self.inner.timeout;
        let mut workers = self.inner.workers.lock().expect("workers mutex poisoned");
        workers.clear();
        for id in 0..n_workers {
            let control = WorkerControl::new();
            let worker = Worker {
                id: id as usize,
                needle: needle.clone(),
                client: self.inner.client.clone(),
                timeout,
                control: control.clone(),
                idle: self.inner.idle.clone(),
                handle: self.inner.clone() as Arc<dyn FrontierHandle>,
            };
            let join = tokio::spawn(worker.run());
            workers.push(WorkerHandle { control, join });
        }

        info!(n_workers, cap, seed = %seed, "crawl started");
        Ok(())
    }

    /// `Process` -> `Pause`. Signals every worker to stop picking up new
    /// URLs; in-flight fetches are allowed to complete.
    pub fn pause(&self) -> Result<(), CrawlError> {
        let current = self.inner.current_state();
        if current != EngineState::Process {
            return Err(CrawlError::InvalidState {
                action: "pause",
                current,
            });
        }
        self.inner.set_state(EngineState::Pause);
        let workers = self.inner.workers.lock().expect("workers mutex poisoned");
        for w in workers.iter() {
            w.control.set_state(WorkerState::Paused);
        }
        Ok(())
    }

    /// `Pause` -> `Process`.
    pub fn resume(&self) -> Result<(), CrawlError> {
        let current = self.inner.current_state();
        if current != EngineState::Pause {
            return Err(CrawlError::InvalidState {
                action: "resume",
                current,
            });
        }
        self.inner.set_state(EngineState::Process);
        let workers = self.inner.workers.lock().expect("workers mutex poisoned");
        for w in workers.iter() {
            w.control.set_state(WorkerState::Running);
        }
        Ok(())
    }

    /// Any state -> `Stop`. Idempotent: stopping an already-stopped engine
    /// is a no-op beyond re-confirming the state and joining zero workers.
    pub async fn stop(&self) {
        self.inner.set_state(EngineState::Stop);

        let handles = {
            let mut workers = self.inner.workers.lock().expect("workers mutex poisoned");
            for w in workers.iter() {
                w.control.set_state(WorkerState::Stopped);
            }
            std::mem::take(&mut *workers)
        };

        for handle in handles {
            if let Err(e) = handle.join.await {
                warn!(error = %e, "worker task join failed during stop");
            }
        }

        {
            let mut frontier = self.inner.frontier.lock().expect("frontier mutex poisoned");
            frontier.reset(1);
        }
        self.inner.in_flight.store(0, Ordering::SeqCst);
        {
            let mut status = self.inner.status.lock().expect("status mutex poisoned");
            status.result_emitted = false;
        }
        info!("crawl stopped");
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
