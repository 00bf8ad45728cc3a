//! src/frontier.rs
//!
//! The URL frontier: a FIFO pending-queue paired with a seen-set that
//! bounds how many distinct URLs a single crawl will ever admit.
//!
//! Invariants (enforced entirely within this type):
//!   - `seen` contains every URL ever admitted -- pending, in-flight, or
//!     completed -- and never shrinks except via `reset`.
//!   - `pending` is a FIFO subset of `seen`.
//!   - `seen.len() <= cap` at all times.
//!   - a URL already in `seen` is never re-admitted.
//!
//! This type does no locking of its own; the engine wraps one instance in a
//! `Mutex` and is the only thing that ever touches it directly.

use std::collections::{HashSet, VecDeque};

pub struct Frontier {
    cap: usize,
    pending: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new(cap: usize) -> Self {
        Frontier {
            cap,
            pending: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Attempt to admit `url`. Returns `true` if it was newly added to the
    /// frontier, `false` if it was a duplicate or the cap was already
    /// reached.
    ///
    /// Deduplication is pure string equality -- no normalization of
    /// trailing slashes, fragments, or host case. Two syntactic variants of
    /// the same resource are both admitted if distinct as strings.
    pub fn admit(&mut self, url: &str) -> bool {
        if self.seen.len() >= self.cap {
            return false;
        }
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.pending.push_back(url.to_string());
        true
    }

    /// Pop the oldest pending URL, if any.
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// True if no URL is currently waiting to be fetched. Does not say
    /// anything about URLs that are in-flight.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count of every URL ever admitted in this cycle.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Clear both halves so a subsequent `Start` begins clean.
    pub fn reset(&mut self, cap: usize) {
        self.cap = cap;
        self.pending.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_seed_then_pops_fifo() {
        let mut f = Frontier::new(10);
        assert!(f.admit("http://a.test/"));
        assert!(f.admit("http://b.test/"));
        assert_eq!(f.pop().as_deref(), Some("http://a.test/"));
        assert_eq!(f.pop().as_deref(), Some("http://b.test/"));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn rejects_duplicates() {
        let mut f = Frontier::new(10);
        assert!(f.admit("http://a.test/"));
        assert!(!f.admit("http://a.test/"));
        assert_eq!(f.seen_len(), 1);
    }

    #[test]
    fn enforces_cap() {
        let mut f = Frontier::new(2);
        assert!(f.admit("http://a.test/"));
        assert!(f.admit("http://b.test/"));
        assert!(!f.admit("http://c.test/"));
        assert_eq!(f.seen_len(), 2);
    }

    #[test]
    fn cap_of_one_admits_only_seed() {
        let mut f = Frontier::new(1);
        assert!(f.admit("http://a.test/"));
        assert!(!f.admit("http://b.test/"));
        assert_eq!(f.seen_len(), 1);
    }

    #[test]
    fn distinct_syntactic_variants_are_not_deduped() {
        let mut f = Frontier::new(10);
        assert!(f.admit("http://a.test/"));
        assert!(f.admit("http://a.test")); // no trailing slash -- different string
        assert_eq!(f.seen_len(), 2);
    }

    #[test]
    fn reset_clears_both_halves() {
        let mut f = Frontier::new(5);
        f.admit("http://a.test/");
        f.admit("http://b.test/");
        f.pop();
        f.reset(10);
        assert!(f.is_empty());
        assert_eq!(f.seen_len(), 0);
    }
}
