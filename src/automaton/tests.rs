use super::*;
use crate::pattern::CompiledPattern;

fn build_from(pattern: &[u8]) -> Automaton {
    let compiled = CompiledPattern::compile(pattern);
    Automaton::build(compiled.canonicals())
}

/// Follow true trie edges from the root; panics if the path is absent.
fn trie_path(automaton: &Automaton, bytes: &[u8]) -> StateId {
    let mut node = StateId::ROOT;
    for &byte in bytes {
        node = automaton.arena[node]
            .edge(byte)
            .unwrap_or_else(|| panic!("missing trie path {:?}", bytes));
    }
    node
}

#[test]
fn test_state_id_sentinels() {
    assert!(StateId::NONE.is_none());
    assert!(!StateId::ROOT.is_none());
    assert_eq!(StateId::ROOT.index(), 0);
}

#[test]
fn test_arena_root_links_to_itself() {
    let arena = StateArena::new();
    assert_eq!(arena.len(), 1);
    assert_eq!(arena[StateId::ROOT].fallback, StateId::ROOT);
    assert_eq!(arena[StateId::ROOT].terminal_fallback, StateId::ROOT);
    assert!(arena[StateId::ROOT].terminates.is_none());
}

#[test]
fn test_arena_edges_stay_sorted() {
    let mut arena = StateArena::new();
    let x = arena.alloc(StateId::ROOT);
    let y = arena.alloc(StateId::ROOT);
    let z = arena.alloc(StateId::ROOT);
    arena[StateId::ROOT].insert_edge(b'm', x);
    arena[StateId::ROOT].insert_edge(b'a', y);
    arena[StateId::ROOT].insert_edge(b'z', z);

    let bytes: Vec<u8> = arena[StateId::ROOT].edges().iter().map(|&(b, _)| b).collect();
    assert_eq!(bytes, vec![b'a', b'm', b'z']);
    assert_eq!(arena[StateId::ROOT].edge(b'a'), Some(y));
    assert_eq!(arena[StateId::ROOT].edge(b'q'), None);
}

#[test]
fn test_arena_repeat_insert_is_noop() {
    let mut arena = StateArena::new();
    let first = arena.get_or_create_child(StateId::ROOT, b'a');
    let second = arena.get_or_create_child(StateId::ROOT, b'a');
    assert_eq!(first, second);
    assert_eq!(arena.len(), 2);

    // An insert for an existing byte keeps the original target.
    let other = arena.alloc(StateId::ROOT);
    arena[StateId::ROOT].insert_edge(b'a', other);
    assert_eq!(arena[StateId::ROOT].edge(b'a'), Some(first));
}

#[test]
fn test_trie_shares_prefixes() {
    // "ab" and "ac" share the 'a' node: root, a, ab, ac.
    let automaton = build_from(b"ab?ac");
    assert_eq!(automaton.state_count(), 4);
}

#[test]
fn test_fallback_links() {
    let automaton = build_from(b"aba?ba");
    let a = trie_path(&automaton, b"a");
    let ab = trie_path(&automaton, b"ab");
    let aba = trie_path(&automaton, b"aba");
    let b = trie_path(&automaton, b"b");
    let ba = trie_path(&automaton, b"ba");

    assert_eq!(automaton.arena[a].fallback, StateId::ROOT);
    assert_eq!(automaton.arena[b].fallback, StateId::ROOT);
    assert_eq!(automaton.arena[ab].fallback, b);
    assert_eq!(automaton.arena[aba].fallback, ba);
    assert_eq!(automaton.arena[ba].fallback, a);
}

#[test]
fn test_terminal_markers() {
    let automaton = build_from(b"aba?ba");
    assert_eq!(automaton.arena[trie_path(&automaton, b"aba")].terminates, Some(0));
    assert_eq!(automaton.arena[trie_path(&automaton, b"ba")].terminates, Some(1));
    assert_eq!(automaton.arena[trie_path(&automaton, b"ab")].terminates, None);
}

#[test]
fn test_step_resolves_through_fallback_and_memoizes() {
    let mut automaton = build_from(b"ab");
    let a = trie_path(&automaton, b"a");
    let ab = trie_path(&automaton, b"ab");
    assert!(automaton.arena[ab].edges().is_empty());

    // "ab" followed by 'a' restarts the pattern at its 'a' suffix.
    assert_eq!(automaton.step(ab, b'a'), a);
    assert_eq!(automaton.arena[ab].edge(b'a'), Some(a));

    // Repeat visit is a direct hit on the cached edge.
    assert_eq!(automaton.step(ab, b'a'), a);
    assert_eq!(automaton.arena[ab].edges().len(), 1);
}

#[test]
fn test_root_misses_stay_at_root_uncached() {
    let mut automaton = build_from(b"ab");
    let root_edges = automaton.arena[StateId::ROOT].edges().len();
    assert_eq!(automaton.step(StateId::ROOT, b'z'), StateId::ROOT);
    assert_eq!(automaton.arena[StateId::ROOT].edges().len(), root_edges);
}

#[test]
fn test_terminals_enumerate_suffix_chain() {
    let mut automaton = build_from(b"aba?ba");
    let mut out = Vec::new();

    // "aba" ends here, and so does its suffix "ba".
    automaton.terminals_into(trie_path(&automaton, b"aba"), &mut out);
    assert_eq!(out, vec![0, 1]);

    automaton.terminals_into(trie_path(&automaton, b"ba"), &mut out);
    assert_eq!(out, vec![1]);

    automaton.terminals_into(trie_path(&automaton, b"ab"), &mut out);
    assert!(out.is_empty());

    automaton.terminals_into(StateId::ROOT, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_terminal_fallback_cache_is_stable() {
    let mut automaton = build_from(b"aba?ba");
    let ab = trie_path(&automaton, b"ab");
    let aba = trie_path(&automaton, b"aba");

    // Non-terminal with no terminal suffix resolves to the root.
    assert_eq!(automaton.terminal_fallback(ab), StateId::ROOT);
    assert_eq!(automaton.arena[ab].terminal_fallback, StateId::ROOT);
    assert_eq!(automaton.terminal_fallback(ab), StateId::ROOT);

    // A terminal state is its own terminal fallback.
    assert_eq!(automaton.terminal_fallback(aba), aba);
}

#[test]
#[should_panic(expected = "corrupt automaton")]
fn test_corrupt_fallback_chain_aborts() {
    let mut automaton = build_from(b"ab");
    let a = trie_path(&automaton, b"a");
    automaton.arena[a].fallback = a;
    automaton.verify_fallbacks();
}

#[test]
fn test_frozen_agrees_with_lazy() {
    let compiled = CompiledPattern::compile(b"ab?ba?aab");
    let mut lazy = Automaton::build(compiled.canonicals());
    let frozen = lazy.clone().freeze();
    assert_eq!(frozen.state_count(), lazy.state_count());

    let ids: Vec<StateId> = lazy.arena.ids().collect();
    let mut lazy_terminals = Vec::new();
    let mut frozen_terminals = Vec::new();
    for &id in &ids {
        for byte in 0..=255u8 {
            assert_eq!(frozen.step(id, byte), lazy.step(id, byte));
        }
        lazy.terminals_into(id, &mut lazy_terminals);
        frozen.terminals_into(id, &mut frozen_terminals);
        assert_eq!(lazy_terminals, frozen_terminals);
    }
}

#[test]
fn test_frozen_transition_is_total() {
    let frozen = build_from(b"ab").freeze();
    for byte in 0..=255u8 {
        // Every byte leads somewhere; unknown bytes land on the root.
        let target = frozen.step(frozen.start(), byte);
        if byte == b'a' {
            assert_ne!(target, StateId::ROOT);
        } else {
            assert_eq!(target, StateId::ROOT);
        }
    }
}

#[test]
fn test_degenerate_automaton_is_root_only() {
    let automaton = build_from(b"???");
    assert_eq!(automaton.state_count(), 1);
}
