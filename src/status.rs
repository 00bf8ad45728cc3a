//! src/status.rs
//!
//! The fixed vocabulary the engine speaks: per-URL statuses, the terminal
//! search verdict, worker/engine lifecycle states, and the event envelope
//! that carries all of the above out to a consumer.

use std::fmt;

/// Status reported for a single URL over the course of one fetch attempt.
///
/// `Process` always precedes exactly one of the remaining (terminal)
/// variants for a given URL, unless a `Stop` intervenes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlStatus {
    Process,
    Found,
    NotFound,
    ErrTimeout,
    ErrConnectionRefused,
    ErrRemoteHostClosed,
    ErrHostNotFound,
    ErrOperationCanceled,
    ErrSslHandshake,
    ErrTemporaryNetwork,
    ErrNetworkSession,
    ErrUnknownNetwork,
    ErrProtocolUnknown,
    ErrUnknown,
}

impl UrlStatus {
    /// A status is terminal if it is anything other than `Process`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, UrlStatus::Process)
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UrlStatus::Process => "PROCESS",
            UrlStatus::Found => "FOUND",
            UrlStatus::NotFound => "NOT_FOUND",
            UrlStatus::ErrTimeout => "ERR_TIMEOUT",
            UrlStatus::ErrConnectionRefused => "ERR_CONNECTION_REFUSED",
            UrlStatus::ErrRemoteHostClosed => "ERR_REMOTE_HOST_CLOSED",
            UrlStatus::ErrHostNotFound => "ERR_HOST_NOT_FOUND",
            UrlStatus::ErrOperationCanceled => "ERR_OPERATION_CANCELED",
            UrlStatus::ErrSslHandshake => "ERR_SSL_HANDSHAKE",
            UrlStatus::ErrTemporaryNetwork => "ERR_TEMPORARY_NETWORK",
            UrlStatus::ErrNetworkSession => "ERR_NETWORK_SESSION",
            UrlStatus::ErrUnknownNetwork => "ERR_UNKNOWN_NETWORK",
            UrlStatus::ErrProtocolUnknown => "ERR_PROTOCOL_UNKNOWN",
            UrlStatus::ErrUnknown => "ERR_UNKNOWN",
        };
        f.write_str(s)
    }
}

/// The worker-side name for the same taxonomy. Kept as a distinct alias
/// (rather than collapsing call sites onto `UrlStatus` directly) so worker
/// code reads as "the status a worker produces" and engine code reads as
/// "the status a URL currently holds", even though the two share one
/// representation.
pub type WorkerStatus = UrlStatus;

/// One-shot terminal verdict for a whole `Start` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found,
    NotFound,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResult::Found => f.write_str("FOUND"),
            SearchResult::NotFound => f.write_str("NOT_FOUND"),
        }
    }
}

/// Engine lifecycle state. `Stop` is the only state reachable from every
/// other state; `Start` is the only transition out of `Stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    Stop = 0,
    Process = 1,
    Pause = 2,
}

impl EngineState {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => EngineState::Process,
            2 => EngineState::Pause,
            _ => EngineState::Stop,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Stop => f.write_str("STOP"),
            EngineState::Process => f.write_str("PROCESS"),
            EngineState::Pause => f.write_str("PAUSE"),
        }
    }
}

/// Per-worker lifecycle state. Monotone in the `Stopped` direction: once a
/// worker observes `Stopped` it exits its loop and never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Running = 0,
    Paused = 1,
    Stopped = 2,
}

impl WorkerState {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => WorkerState::Paused,
            2 => WorkerState::Stopped,
            _ => WorkerState::Running,
        }
    }
}

/// Everything the engine ever pushes to a subscriber, as a typed event
/// enum rather than a pair of ad hoc callbacks: per-URL status transitions
/// and the one-shot terminal verdict are the two variants below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UrlStatus { url: String, status: UrlStatus },
    SearchResult(SearchResult),
}
