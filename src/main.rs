//! src/main.rs
//!
//! Entry point for the needlecrawl binary.
//!
//! This is a thin presentation collaborator sitting outside the crawl
//! core: it parses CLI flags, validates them (the engine itself never
//! does), starts the engine, prints the event stream as it arrives, and
//! stops the engine on a terminal verdict or on Ctrl-C. Nothing here
//! touches the engine's internals -- `needlecrawl::Engine` is the only
//! surface it depends on, so a GUI could swap in for this file without
//! the engine changing at all.

mod args;

use args::Cli;
use clap::Parser;
use needlecrawl::{CrawlError, Engine, EngineEvent, SearchResult};
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), CrawlError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    cli.validate()?;

    let engine = Engine::new();
    let mut events = engine.subscribe();

    engine.start(cli.seed.clone(), cli.workers, cli.needle.clone(), cli.cap)?;
    info!(seed = %cli.seed, workers = cli.workers, cap = cli.cap, "crawl started");

    let result = tokio::select! {
        result = drain_until_result(&mut events) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, stopping crawl");
            None
        }
    };

    engine.stop().await;

    match result {
        Some(SearchResult::Found) => println!("FOUND"),
        Some(SearchResult::NotFound) => println!("NOT_FOUND"),
        None => println!("STOPPED"),
    }

    Ok(())
}

/// Print every `UrlStatus` event as it arrives and return the terminal
/// `SearchResult` once the engine emits one.
async fn drain_until_result(
    events: &mut tokio::sync::broadcast::Receiver<EngineEvent>,
) -> Option<SearchResult> {
    loop {
        match events.recv().await {
            Ok(EngineEvent::UrlStatus { url, status }) => {
                println!("{status}\t{url}");
            }
            Ok(EngineEvent::SearchResult(result)) => {
                return Some(result);
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event subscriber lagged, some events were dropped");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                return None;
            }
        }
    }
}
