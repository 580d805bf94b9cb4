//! Arena-based state allocation for the matching automaton.
//!
//! Fallback links form a cyclic graph (the root is its own fallback, and
//! deep states point back toward shallow ones), so states cannot own each
//! other. Instead all states live in one contiguous arena owned by the
//! automaton and reference each other by `StateId` index: O(1) dereference,
//! no lifetime cycles.

use smallvec::SmallVec;

/// A state identifier - just an index into the arena.
///
/// This can be freely copied and allows cyclic references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    /// Special sentinel value for "no state" / unfilled cache slot.
    pub const NONE: StateId = StateId(u32::MAX);

    /// The trie root. The arena always allocates it first.
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A state in the arena-based automaton.
///
/// `edges` starts out holding only true trie edges; resolving a missing
/// transition through the fallback chain memoizes the result as a direct
/// edge here, so the distinction disappears under traffic.
#[derive(Clone, Debug)]
pub struct TrieState {
    /// Outgoing edges as (byte, target) pairs, kept sorted by byte.
    edges: SmallVec<[(u8, StateId); 4]>,
    /// Suffix link: the state for the longest proper suffix of this state's
    /// path that is also a trie path. The root links to itself.
    pub fallback: StateId,
    /// Cached terminal-fallback: this state if it is terminal, else the
    /// nearest terminal state on the fallback chain, else the root.
    /// `NONE` until first computed.
    pub terminal_fallback: StateId,
    /// Canonical-pattern index ending exactly at this state, if any.
    pub terminates: Option<u32>,
}

impl TrieState {
    fn new(fallback: StateId) -> Self {
        Self {
            edges: SmallVec::new(),
            fallback,
            terminal_fallback: StateId::NONE,
            terminates: None,
        }
    }

    /// Look up the direct edge for `byte`, trie or memoized.
    #[inline]
    pub fn edge(&self, byte: u8) -> Option<StateId> {
        match self.edges.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(pos) => Some(self.edges[pos].1),
            Err(_) => None,
        }
    }

    /// Insert a direct edge. Resolving the same missing edge twice produces
    /// the same target, so a repeat insert is a no-op.
    #[inline]
    pub fn insert_edge(&mut self, byte: u8, target: StateId) {
        if let Err(pos) = self.edges.binary_search_by_key(&byte, |&(b, _)| b) {
            self.edges.insert(pos, (byte, target));
        }
    }

    /// Outgoing edges, sorted by byte.
    pub fn edges(&self) -> &[(u8, StateId)] {
        &self.edges
    }
}

/// Arena owning every state of one automaton.
///
/// States are allocated contiguously and referenced by `StateId`; the arena
/// frees all state memory when dropped.
#[derive(Clone, Debug)]
pub struct StateArena {
    states: Vec<TrieState>,
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl StateArena {
    /// Create an arena holding only the root, which is its own fallback and
    /// its own terminal fallback.
    pub fn new() -> Self {
        let mut root = TrieState::new(StateId::ROOT);
        root.terminal_fallback = StateId::ROOT;
        Self { states: vec![root] }
    }

    /// Allocate a new state with the given fallback, returning its ID.
    pub fn alloc(&mut self, fallback: StateId) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(TrieState::new(fallback));
        id
    }

    /// Find the child of `parent` for `byte`, creating it (with a
    /// placeholder root fallback, fixed up by the breadth-first link pass)
    /// if absent.
    pub fn get_or_create_child(&mut self, parent: StateId, byte: u8) -> StateId {
        if let Some(child) = self.states[parent.index()].edge(byte) {
            return child;
        }
        let child = self.alloc(StateId::ROOT);
        self.states[parent.index()].insert_edge(byte, child);
        child
    }

    /// Number of states in the arena.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Iterate every allocated `StateId`, root first.
    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.states.len() as u32).map(StateId)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl std::ops::Index<StateId> for StateArena {
    type Output = TrieState;

    #[inline]
    fn index(&self, id: StateId) -> &Self::Output {
        &self.states[id.index()]
    }
}

impl std::ops::IndexMut<StateId> for StateArena {
    #[inline]
    fn index_mut(&mut self, id: StateId) -> &mut Self::Output {
        &mut self.states[id.index()]
    }
}
