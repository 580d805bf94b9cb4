//! Aho-Corasick automaton over the canonical patterns.
//!
//! The trie is built once from the deduplicated subpattern texts, fallback
//! links are computed breadth-first from the root, and the automaton is then
//! immutable in meaning: stepping only fills two idempotent caches (resolved
//! transition edges and terminal-fallback shortcuts), so repeat visits cost
//! O(1) without precomputing the full transition table up front.

use std::collections::VecDeque;

use smallvec::SmallVec;

use super::arena::{StateArena, StateId};
use super::frozen::FrozenAutomaton;
use crate::pattern::CanonicalPattern;

/// Multi-pattern matching automaton with lazily-cached transitions.
///
/// Stepping takes `&mut self` because it memoizes resolved edges into the
/// arena; the results are a pure function of the trie, so the mutation is
/// invisible to callers. For immutable cross-thread sharing, convert with
/// [`freeze`](Self::freeze).
#[derive(Clone, Debug)]
pub struct Automaton {
    pub(super) arena: StateArena,
}

impl Automaton {
    /// Build the trie over `canonicals` and link fallbacks breadth-first.
    ///
    /// Each canonical text's exact end state is marked with its index.
    /// Construction panics if the linked fallback graph is corrupt (a chain
    /// that cannot reach the root); that is a programming error, never an
    /// input error.
    pub fn build(canonicals: &[CanonicalPattern]) -> Self {
        let mut arena = StateArena::new();
        for (idx, canonical) in canonicals.iter().enumerate() {
            let mut node = StateId::ROOT;
            for &byte in canonical.text() {
                node = arena.get_or_create_child(node, byte);
            }
            arena[node].terminates = Some(idx as u32);
        }

        let mut automaton = Self { arena };
        automaton.link_fallbacks();
        automaton.verify_fallbacks();
        automaton
    }

    /// The state every stream starts in.
    pub fn start(&self) -> StateId {
        StateId::ROOT
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.arena.len()
    }

    /// Compute fallback links level by level.
    ///
    /// A child of the root falls back to the root; any deeper state `v`
    /// reached from `u` on `byte` falls back to the first state on `u`'s
    /// fallback chain that has a `byte` edge, else the root. At this point
    /// the arena holds only true trie edges, so the lookups are exact.
    fn link_fallbacks(&mut self) {
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(StateId::ROOT);
        while let Some(u) = queue.pop_front() {
            let edges: SmallVec<[(u8, StateId); 8]> =
                SmallVec::from_slice(self.arena[u].edges());
            for (byte, v) in edges {
                let fb = if u == StateId::ROOT {
                    StateId::ROOT
                } else {
                    let mut f = self.arena[u].fallback;
                    loop {
                        if let Some(t) = self.arena[f].edge(byte) {
                            break t;
                        }
                        if f == StateId::ROOT {
                            break StateId::ROOT;
                        }
                        f = self.arena[f].fallback;
                    }
                };
                self.arena[v].fallback = fb;
                queue.push_back(v);
            }
        }
    }

    /// Abort construction if any fallback chain fails to reach the root
    /// within `state_count` hops.
    pub(super) fn verify_fallbacks(&self) {
        let max_hops = self.arena.len();
        for start in self.arena.ids() {
            let mut cur = start;
            let mut hops = 0;
            while cur != StateId::ROOT {
                cur = self.arena[cur].fallback;
                hops += 1;
                if hops > max_hops {
                    panic!(
                        "corrupt automaton: fallback chain from state {} does not reach the root",
                        start.index()
                    );
                }
            }
        }
    }

    /// Advance from `from` on `byte`.
    ///
    /// Follows the direct edge when present; otherwise resolves along the
    /// fallback chain with an explicit loop (pathological self-similar
    /// patterns would otherwise recurse to the pattern's depth) and caches
    /// the resolved target on every state that missed, so the next visit is
    /// a direct hit. An unknown byte at the root stays at the root.
    pub fn step(&mut self, from: StateId, byte: u8) -> StateId {
        let mut missed: SmallVec<[StateId; 8]> = SmallVec::new();
        let mut cur = from;
        let target = loop {
            if let Some(next) = self.arena[cur].edge(byte) {
                break next;
            }
            if cur == StateId::ROOT {
                break StateId::ROOT;
            }
            missed.push(cur);
            cur = self.arena[cur].fallback;
        };
        for &id in &missed {
            self.arena[id].insert_edge(byte, target);
        }
        target
    }

    /// Collect into `out` the canonical-pattern indices of every pattern
    /// ending at `state`'s stream position, nearest-suffix first.
    ///
    /// Walks the terminal-fallback chain: a terminal state yields its index
    /// and continues from its fallback; a non-terminal state jumps straight
    /// to its cached nearest terminal suffix. Each index appears at most
    /// once per call.
    pub fn terminals_into(&mut self, state: StateId, out: &mut Vec<u32>) {
        out.clear();
        let mut node = state;
        while node != StateId::ROOT {
            if let Some(idx) = self.arena[node].terminates {
                out.push(idx);
                node = self.arena[node].fallback;
            } else {
                node = self.terminal_fallback(node);
            }
        }
    }

    /// Resolve (and cache) the terminal-fallback of `state`: `state` itself
    /// if terminal, else the nearest terminal state on its fallback chain,
    /// else the root.
    ///
    /// Every unresolved state walked over shares the same answer, so one
    /// pass fills the whole chain. The cache is a pure function of the trie
    /// and is stable forever.
    pub(super) fn terminal_fallback(&mut self, state: StateId) -> StateId {
        let mut chain: SmallVec<[StateId; 8]> = SmallVec::new();
        let mut cur = state;
        let resolved = loop {
            let node = &self.arena[cur];
            if !node.terminal_fallback.is_none() {
                break node.terminal_fallback;
            }
            if node.terminates.is_some() {
                break cur;
            }
            // The root's cache is seeded at arena creation, so this walk
            // always stops before running off the chain.
            chain.push(cur);
            cur = node.fallback;
        };
        if self.arena[cur].terminal_fallback.is_none() {
            self.arena[cur].terminal_fallback = resolved;
        }
        for &id in &chain {
            self.arena[id].terminal_fallback = resolved;
        }
        resolved
    }

    /// Pre-resolve every transition and terminal-fallback into an immutable
    /// `Send + Sync` automaton for sharing across threads.
    pub fn freeze(self) -> FrozenAutomaton {
        FrozenAutomaton::build(self)
    }
}
