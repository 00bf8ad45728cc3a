//! src/error.rs
//!
//! Central error type for the crawl engine and its CLI collaborator.
//!
//! Per-URL fetch failures are never represented here -- those are classified
//! into `UrlStatus::Err*` variants (see `fetcher.rs`) and published as
//! ordinary events. `CrawlError` exists only for the handful of things that
//! genuinely fail synchronously: a malformed seed URL, a command issued
//! while the engine is in the wrong state, or a worker task that panicked
//! instead of returning.

use std::{error::Error, fmt};

use crate::status::EngineState;

/// Top-level error type for the application.
///
/// Each variant represents an application-specific condition; this enum is
/// hand-rolled with manual `Display`/`Error`/`From` impls rather than pulled
/// in from a derive crate, matching how the rest of this codebase does
/// error handling.
#[derive(Debug)]
pub enum CrawlError {
    /// The seed URL does not look like an absolute http(s) URL.
    InvalidSeedUrl(String),

    /// The needle (search text) was empty.
    EmptyNeedle,

    /// `n_workers` or `cap` were outside their documented ranges.
    InvalidParameter { name: &'static str, value: String },

    /// A command was issued while the engine was in a state that does not
    /// permit it (e.g. `Start` while already running).
    InvalidState {
        action: &'static str,
        current: EngineState,
    },

    /// A worker task failed to join (panicked or was cancelled).
    Join(tokio::task::JoinError),
}

/// Human-readable error messages.
impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlError::InvalidSeedUrl(s) => {
                write!(f, "invalid seed url (must be absolute http/https): {s}")
            }
            CrawlError::EmptyNeedle => write!(f, "search text must not be empty"),
            CrawlError::InvalidParameter { name, value } => {
                write!(f, "invalid value for {name}: {value}")
            }
            CrawlError::InvalidState { action, current } => {
                write!(f, "cannot {action} while engine is {current}")
            }
            CrawlError::Join(e) => write!(f, "worker task join error: {e}"),
        }
    }
}

impl Error for CrawlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CrawlError::Join(e) => Some(e),
            _ => None,
        }
    }
}

/// Convert Tokio task join failures into `CrawlError::Join`.
///
/// This surfaces panics/cancellations from spawned worker tasks back to
/// whoever awaited them.
impl From<tokio::task::JoinError> for CrawlError {
    fn from(e: tokio::task::JoinError) -> Self {
        CrawlError::Join(e)
    }
}
