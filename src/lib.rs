//! wildscan: streaming wildcard pattern matching over byte streams.
//!
//! A pattern may contain `?` wildcards, each matching any single byte. The
//! pattern's fixed substrings are compiled into an Aho-Corasick automaton;
//! as a stream is consumed one byte at a time, substring terminations are
//! chained back together online, and every full-pattern match is reported
//! by its start offset the moment the stream covers it. The stream is read
//! exactly once and never buffered.
//!
//! One-shot search:
//! ```
//! use wildscan::Scanner;
//!
//! let scanner = Scanner::compile(b"ab?ab");
//! assert_eq!(scanner.find_all(b"xxabzabyy"), vec![2]);
//! ```
//!
//! Incremental streaming:
//! ```
//! use wildscan::Scanner;
//!
//! let scanner = Scanner::compile(b"a?c");
//! let mut matcher = scanner.matcher();
//! let mut starts = Vec::new();
//! for &byte in b"xaycz" {
//!     starts.extend(matcher.consume(byte).unwrap());
//! }
//! matcher.finish();
//! assert_eq!(starts, vec![1]);
//! ```

mod automaton;
mod pattern;
mod stream;

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

pub use automaton::{Automaton, FrozenAutomaton, StateId};
pub use pattern::{CanonicalPattern, CompiledPattern, DEFAULT_WILDCARD};
pub use stream::{Matches, StreamMatcher};

/// Errors reported during streaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanError {
    /// `consume` or `scan` was called after `finish`.
    StreamFinished,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::StreamFinished => write!(f, "stream already finished"),
        }
    }
}

impl std::error::Error for ScanError {}

/// A compiled wildcard pattern, ready to spawn stream matchers.
///
/// Each [`matcher`](Self::matcher) gets a private automaton whose
/// lazily-cached transitions fill in under that stream's traffic. To share
/// one fully resolved automaton across threads instead, use
/// [`freeze`](Self::freeze).
///
/// A pattern that is empty matches nothing; a pattern consisting entirely
/// of wildcards matches every window of the pattern's length.
#[derive(Clone, Debug)]
pub struct Scanner {
    compiled: Arc<CompiledPattern>,
}

impl Scanner {
    /// Compile `pattern` with the default `?` wildcard.
    pub fn compile(pattern: &[u8]) -> Self {
        Self::compile_with_wildcard(pattern, DEFAULT_WILDCARD)
    }

    /// Compile `pattern` treating `wildcard` as the any-byte symbol.
    pub fn compile_with_wildcard(pattern: &[u8], wildcard: u8) -> Self {
        Self {
            compiled: Arc::new(CompiledPattern::compile_with_wildcard(pattern, wildcard)),
        }
    }

    /// The decomposed pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.compiled
    }

    /// Spawn a matcher for one input stream.
    pub fn matcher(&self) -> StreamMatcher {
        StreamMatcher::lazy(self.compiled.clone())
    }

    /// Search a whole in-memory haystack, returning every match start in
    /// increasing order.
    pub fn find_all(&self, haystack: &[u8]) -> Vec<usize> {
        let mut matcher = self.matcher();
        let mut all = Vec::new();
        for &byte in haystack {
            all.extend(matcher.advance(byte));
        }
        matcher.finish();
        all
    }

    /// Pre-resolve the automaton for immutable cross-thread sharing.
    pub fn freeze(&self) -> FrozenScanner {
        let automaton = Automaton::build(self.compiled.canonicals()).freeze();
        FrozenScanner {
            automaton: Arc::new(automaton),
            compiled: self.compiled.clone(),
        }
    }
}

/// A scanner whose automaton is fully pre-resolved and immutable.
///
/// `Send + Sync`; clones share the automaton, and matchers spawned from any
/// clone (or thread) read it with no synchronization.
#[derive(Clone, Debug)]
pub struct FrozenScanner {
    automaton: Arc<FrozenAutomaton>,
    compiled: Arc<CompiledPattern>,
}

impl FrozenScanner {
    /// Compile and freeze in one step, with the default `?` wildcard.
    pub fn compile(pattern: &[u8]) -> Self {
        Scanner::compile(pattern).freeze()
    }

    /// Compile and freeze, treating `wildcard` as the any-byte symbol.
    pub fn compile_with_wildcard(pattern: &[u8], wildcard: u8) -> Self {
        Scanner::compile_with_wildcard(pattern, wildcard).freeze()
    }

    /// The decomposed pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.compiled
    }

    /// Spawn a matcher sharing the pre-resolved automaton.
    pub fn matcher(&self) -> StreamMatcher {
        StreamMatcher::shared(self.automaton.clone(), self.compiled.clone())
    }

    /// Search a whole in-memory haystack, returning every match start in
    /// increasing order.
    pub fn find_all(&self, haystack: &[u8]) -> Vec<usize> {
        let mut matcher = self.matcher();
        let mut all = Vec::new();
        for &byte in haystack {
            all.extend(matcher.advance(byte));
        }
        matcher.finish();
        all
    }
}

/// A hot-swappable scanner for long-lived concurrent pipelines.
///
/// Matcher spawning is lock-free: every [`matcher`](Self::matcher) call
/// reads the current frozen snapshot atomically. Replacing the pattern
/// recompiles and swaps the snapshot; matchers already in flight keep the
/// snapshot they started with, so a stream is always matched against a
/// single consistent pattern.
pub struct SharedScanner {
    current: ArcSwap<FrozenScanner>,
    swap_lock: Mutex<()>,
}

impl SharedScanner {
    /// Compile `pattern` with the default `?` wildcard.
    pub fn new(pattern: &[u8]) -> Self {
        Self::with_wildcard(pattern, DEFAULT_WILDCARD)
    }

    /// Compile `pattern` treating `wildcard` as the any-byte symbol.
    pub fn with_wildcard(pattern: &[u8], wildcard: u8) -> Self {
        Self {
            current: ArcSwap::from_pointee(FrozenScanner::compile_with_wildcard(
                pattern, wildcard,
            )),
            swap_lock: Mutex::new(()),
        }
    }

    /// Atomically replace the pattern (default `?` wildcard).
    pub fn replace_pattern(&self, pattern: &[u8]) {
        self.replace_pattern_with_wildcard(pattern, DEFAULT_WILDCARD);
    }

    /// Atomically replace the pattern with an explicit wildcard byte.
    pub fn replace_pattern_with_wildcard(&self, pattern: &[u8], wildcard: u8) {
        // Serialize replacements so a slow compile cannot clobber a newer
        // pattern that finished after it.
        let _guard = self.swap_lock.lock();
        self.current
            .store(Arc::new(FrozenScanner::compile_with_wildcard(
                pattern, wildcard,
            )));
    }

    /// Spawn a matcher against the current snapshot. Lock-free.
    pub fn matcher(&self) -> StreamMatcher {
        self.current.load().matcher()
    }

    /// The current snapshot, pinned.
    pub fn snapshot(&self) -> FrozenScanner {
        FrozenScanner::clone(&self.current.load())
    }
}
