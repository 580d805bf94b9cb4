//! The Aho-Corasick matching engine.
//!
//! - `arena`: index-based state storage (fallback links are cyclic, so
//!   states reference each other by `StateId` instead of owning pointers)
//! - `trie`: trie construction, breadth-first fallback linking, lazy
//!   memoized stepping, and terminal enumeration
//! - `frozen`: the pre-resolved immutable form for cross-thread sharing

mod arena;
mod frozen;
mod trie;

pub use arena::{StateArena, StateId, TrieState};
pub use frozen::FrozenAutomaton;
pub use trie::Automaton;

#[cfg(test)]
mod tests;
