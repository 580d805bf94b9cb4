//! Pre-resolved, immutable form of the automaton.
//!
//! The lazy automaton memoizes transitions as streams exercise them, which
//! makes stepping `&mut`. Freezing resolves every `(state, byte)` transition
//! and every terminal-fallback up front, producing a read-only automaton
//! whose transition function is total. Frozen automata are `Send + Sync`
//! and are shared across concurrent matchers behind an `Arc` with no
//! synchronization at all.

use super::arena::StateId;
use super::trie::Automaton;

/// Run-length packed transition table for one state.
///
/// Each ceiling marks the exclusive upper bound of a byte range mapping to
/// the corresponding step; the final ceiling is always 256, so lookup is
/// total. Long runs of bytes sharing a target (common once fallbacks are
/// resolved, since most bytes lead back toward the root) collapse to one
/// entry.
#[derive(Clone, Debug)]
struct PackedTable {
    /// Upper bounds (exclusive) for each byte range.
    ceilings: Vec<u16>,
    /// Target state for each range.
    steps: Vec<StateId>,
}

impl PackedTable {
    /// Pack a full 256-entry transition array into compressed form.
    fn pack(unpacked: &[StateId; 256]) -> Self {
        let mut ceilings = Vec::with_capacity(8);
        let mut steps = Vec::with_capacity(8);

        let mut current = unpacked[0];
        for (i, &target) in unpacked.iter().enumerate() {
            if target != current {
                ceilings.push(i as u16);
                steps.push(current);
                current = target;
            }
        }
        ceilings.push(256);
        steps.push(current);

        Self { ceilings, steps }
    }

    /// Look up the target for a byte. Total by construction.
    #[inline]
    fn step(&self, byte: u8) -> StateId {
        let b = byte as u16;
        for (i, &ceiling) in self.ceilings.iter().enumerate() {
            if b < ceiling {
                return self.steps[i];
            }
        }
        self.steps[self.steps.len() - 1]
    }
}

/// One frozen state: packed transitions plus the fully materialized
/// fallback, terminal-fallback, and terminal marker.
#[derive(Clone, Debug)]
struct FrozenState {
    table: PackedTable,
    fallback: StateId,
    terminal_fallback: StateId,
    terminates: Option<u32>,
}

/// Immutable automaton with every transition pre-resolved.
#[derive(Clone, Debug)]
pub struct FrozenAutomaton {
    states: Vec<FrozenState>,
}

impl FrozenAutomaton {
    /// Resolve every edge and terminal-fallback of `automaton`.
    pub fn build(mut automaton: Automaton) -> Self {
        let ids: Vec<StateId> = automaton.arena.ids().collect();
        let mut states = Vec::with_capacity(ids.len());
        for &id in &ids {
            let mut unpacked = [StateId::ROOT; 256];
            for byte in 0..=255u8 {
                unpacked[byte as usize] = automaton.step(id, byte);
            }
            let terminal_fallback = automaton.terminal_fallback(id);
            let node = &automaton.arena[id];
            states.push(FrozenState {
                table: PackedTable::pack(&unpacked),
                fallback: node.fallback,
                terminal_fallback,
                terminates: node.terminates,
            });
        }
        Self { states }
    }

    /// The state every stream starts in.
    pub fn start(&self) -> StateId {
        StateId::ROOT
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Advance from `from` on `byte`. Total: an unknown byte lands on the
    /// root.
    #[inline]
    pub fn step(&self, from: StateId, byte: u8) -> StateId {
        self.states[from.index()].table.step(byte)
    }

    /// Collect into `out` the canonical-pattern indices of every pattern
    /// ending at `state`'s stream position, nearest-suffix first.
    pub fn terminals_into(&self, state: StateId, out: &mut Vec<u32>) {
        out.clear();
        let mut node = state;
        while node != StateId::ROOT {
            let frozen = &self.states[node.index()];
            if let Some(idx) = frozen.terminates {
                out.push(idx);
                node = frozen.fallback;
            } else {
                node = frozen.terminal_fallback;
            }
        }
    }
}
