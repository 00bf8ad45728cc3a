//! needlecrawl
//!
//! A bounded-breadth crawl engine: a concurrent worker pool that consumes a
//! shared, deduplicating URL frontier, fetches each URL over HTTP(S) with a
//! hard per-request timeout, classifies transport failures into a fixed
//! status taxonomy, extracts further URLs from response bodies, and
//! terminates deterministically on first match, on frontier exhaustion, or
//! on command.
//!
//! This library is the core described as the "engine" -- everything a
//! presentation layer (a GUI, or the small terminal collaborator in
//! `src/main.rs`) needs to drive and observe a crawl without reaching into
//! its internals.

pub mod engine;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod frontier;
pub mod status;
pub mod worker;

pub use engine::Engine;
pub use error::CrawlError;
pub use status::{EngineEvent, EngineState, SearchResult, UrlStatus, WorkerState, WorkerStatus};
