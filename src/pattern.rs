//! Wildcard pattern decomposition.
//!
//! A wildcard pattern is split into *subpatterns*: maximal runs of
//! non-wildcard bytes, numbered left to right (their *places*). Identical
//! run texts are deduplicated into a single [`CanonicalPattern`] that
//! remembers every place it occupies, so the automaton is built over unique
//! texts only. The wildcard runs between subpatterns become the displacement
//! table that the stream matcher uses to chain independent substring
//! terminations back into full-pattern matches.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// The default wildcard byte: matches any single input byte.
pub const DEFAULT_WILDCARD: u8 = b'?';

/// A deduplicated fixed-text subpattern.
///
/// When the wildcard pattern repeats a substring (as in `ab?ab`), one
/// canonical pattern carries both places.
#[derive(Clone, Debug)]
pub struct CanonicalPattern {
    text: Box<[u8]>,
    /// Subpattern places occupied by this text, in ascending order.
    places: SmallVec<[u32; 2]>,
}

impl CanonicalPattern {
    /// The fixed byte text.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// The subpattern places this text occupies, ascending.
    pub fn places(&self) -> &[u32] {
        &self.places
    }
}

/// A wildcard pattern decomposed for streaming matching.
///
/// Immutable once compiled; the automaton and any number of stream matchers
/// are derived from it.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    wildcard: u8,
    pattern_len: usize,
    left_padding: usize,
    right_padding: usize,
    canonicals: Vec<CanonicalPattern>,
    /// `displacements[p]` is the number of wildcard bytes immediately before
    /// subpattern place `p`; entry 0 is the leading wildcard run.
    displacements: Vec<usize>,
    /// Fixed-text length at each subpattern place.
    subpattern_lens: Vec<usize>,
}

impl CompiledPattern {
    /// Compile `pattern` with the default `?` wildcard.
    pub fn compile(pattern: &[u8]) -> Self {
        Self::compile_with_wildcard(pattern, DEFAULT_WILDCARD)
    }

    /// Compile `pattern` treating `wildcard` as the any-byte symbol.
    ///
    /// A pattern that is empty or consists entirely of wildcards compiles to
    /// the degenerate zero-subpattern form; see
    /// [`is_degenerate`](Self::is_degenerate).
    pub fn compile_with_wildcard(pattern: &[u8], wildcard: u8) -> Self {
        let pattern_len = pattern.len();
        let left_padding = pattern.iter().take_while(|&&b| b == wildcard).count();
        if left_padding == pattern_len {
            // All wildcards (or empty): nothing to anchor the automaton on.
            return Self {
                wildcard,
                pattern_len,
                left_padding,
                right_padding: 0,
                canonicals: Vec::new(),
                displacements: Vec::new(),
                subpattern_lens: Vec::new(),
            };
        }
        let right_padding = pattern.iter().rev().take_while(|&&b| b == wildcard).count();
        let core = &pattern[left_padding..pattern_len - right_padding];

        let mut known: FxHashMap<&[u8], usize> = FxHashMap::default();
        let mut canonicals: Vec<CanonicalPattern> = Vec::new();
        let mut displacements = Vec::new();
        let mut subpattern_lens = Vec::new();

        let mut gap = left_padding;
        let mut i = 0;
        while i < core.len() {
            if core[i] == wildcard {
                gap += 1;
                i += 1;
                continue;
            }
            let start = i;
            while i < core.len() && core[i] != wildcard {
                i += 1;
            }
            let text = &core[start..i];
            let place = subpattern_lens.len() as u32;
            displacements.push(gap);
            subpattern_lens.push(text.len());
            gap = 0;
            match known.get(text).copied() {
                Some(idx) => canonicals[idx].places.push(place),
                None => {
                    known.insert(text, canonicals.len());
                    canonicals.push(CanonicalPattern {
                        text: text.into(),
                        places: SmallVec::from_slice(&[place]),
                    });
                }
            }
        }

        Self {
            wildcard,
            pattern_len,
            left_padding,
            right_padding,
            canonicals,
            displacements,
            subpattern_lens,
        }
    }

    /// The wildcard byte this pattern was compiled with.
    pub fn wildcard(&self) -> u8 {
        self.wildcard
    }

    /// Total pattern length in bytes, wildcards included.
    pub fn pattern_len(&self) -> usize {
        self.pattern_len
    }

    /// Length of the leading wildcard run.
    pub fn left_padding(&self) -> usize {
        self.left_padding
    }

    /// Length of the trailing wildcard run.
    pub fn right_padding(&self) -> usize {
        self.right_padding
    }

    /// Number of subpattern places.
    pub fn subpattern_count(&self) -> usize {
        self.subpattern_lens.len()
    }

    /// Deduplicated canonical patterns, in first-occurrence order.
    pub fn canonicals(&self) -> &[CanonicalPattern] {
        &self.canonicals
    }

    /// True for the zero-subpattern (all-wildcard or empty) form.
    pub fn is_degenerate(&self) -> bool {
        self.canonicals.is_empty()
    }

    /// Wildcard run length immediately before place `p` (entry 0 is the
    /// left padding).
    pub fn displacement(&self, place: usize) -> usize {
        self.displacements[place]
    }

    /// Distance from the end of place `p - 1` to the end of place `p`:
    /// the wildcard gap plus the fixed text length.
    pub(crate) fn step_to(&self, place: usize) -> usize {
        self.displacements[place] + self.subpattern_lens[place]
    }

    /// Earliest stream offset at which the first subpattern can terminate in
    /// a valid match. Terminations before this offset cannot leave room for
    /// the leading wildcard run.
    pub(crate) fn cutoff(&self) -> usize {
        self.left_padding + self.subpattern_lens[0] - 1
    }
}
