//! src/args.rs
//!
//! Purpose:
//!   Define the command-line interface for the crawler's terminal
//!   collaborator using `clap`'s derive API. This struct describes the
//!   flags the binary accepts; `Cli::parse()` populates it from
//!   `std::env::args()` at runtime.
//!
//! This is the presentation-layer configuration surface only: the engine
//! itself (`engine.rs`) never reads `clap` or any CLI type directly, so a
//! future GUI collaborator could drive the same `Engine` without touching
//! this module at all.

use clap::Parser;

/// Top-level CLI configuration.
///
/// `author`, `version`, and `about` are used by `--help` and `--version`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Seed URL to start crawling from (must be an absolute http:// or
    /// https:// URL). Positional, no flag required:
    ///     needlecrawl http://example.com/ --needle "hello"
    pub seed: String,

    /// The substring to search for in fetched page bodies. Matching is
    /// case-sensitive, plain substring containment.
    #[arg(short, long)]
    pub needle: String,

    /// Number of concurrent workers. Bounded below by 1; the OS/runtime
    /// bounds it above in practice, but no hard ceiling is enforced here.
    ///
    /// Short form:  -w <N>
    /// Long form:   --workers <N>
    #[arg(short, long, default_value_t = 4)]
    pub workers: u16,

    /// Maximum number of distinct URLs ever admitted to the frontier in
    /// this crawl.
    ///
    /// Short form:  -c <N>
    /// Long form:   --cap <N>
    #[arg(short, long, default_value_t = 100)]
    pub cap: u32,
}

impl Cli {
    /// Validate the parts of the configuration the engine itself does not
    /// validate: input validation is this collaborator's job, not the
    /// engine's.
    pub fn validate(&self) -> Result<(), needlecrawl::CrawlError> {
        if !self.seed.starts_with("http://") && !self.seed.starts_with("https://") {
            return Err(needlecrawl::CrawlError::InvalidSeedUrl(self.seed.clone()));
        }
        if self.needle.is_empty() {
            return Err(needlecrawl::CrawlError::EmptyNeedle);
        }
        if self.workers < 1 {
            return Err(needlecrawl::CrawlError::InvalidParameter {
                name: "workers",
                value: self.workers.to_string(),
            });
        }
        if !(1..=9999).contains(&self.cap) {
            return Err(needlecrawl::CrawlError::InvalidParameter {
                name: "cap",
                value: self.cap.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            seed: "http://a.test/".to_string(),
            needle: "needle".to_string(),
            workers: 4,
            cap: 100,
        }
    }

    #[test]
    fn valid_cli_passes() {
        assert!(base_cli().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_seed() {
        let mut cli = base_cli();
        cli.seed = "ftp://a.test/".to_string();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_empty_needle() {
        let mut cli = base_cli();
        cli.needle = String::new();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_cap_out_of_range() {
        let mut cli = base_cli();
        cli.cap = 0;
        assert!(cli.validate().is_err());
        cli.cap = 10_000;
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_zero_workers() {
        let mut cli = base_cli();
        cli.workers = 0;
        assert!(cli.validate().is_err());
    }
}
