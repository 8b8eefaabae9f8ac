//! Trivial-zero and sector-admissibility predicates
//!
//! Two formulations of the adjacency test are kept side by side: a substring
//! scan over the dihedral orbit of the double-adjacency table, and a single
//! pass over the word using the forbidden-successor map derived from the
//! same identities. They must agree on every word.

use super::tables::{DOUBLE_ADJACENCY_ORBIT, FINAL_ENTRIES, FIRST_ENTRY};
use crate::symbol::Word;

/// Forbidden successors per letter; a pair `xy` with `y` in `successors(x)`
/// forces the word's coefficient to zero
pub fn forbidden_successors(letter: char) -> &'static str {
    match letter {
        'a' => "d",
        'b' => "e",
        'c' => "f",
        'd' => "aef",
        'e' => "bdf",
        'f' => "cde",
        _ => "",
    }
}

/// Whether any forbidden adjacent pair occurs, by substring scan
pub fn has_forbidden_pair_scan(word: &Word) -> bool {
    DOUBLE_ADJACENCY_ORBIT.iter().any(|rel| {
        rel.iter()
            .any(|(frag, _)| !word.find_all(frag.as_str()).is_empty())
    })
}

/// Whether any forbidden adjacent pair occurs, by one walk over the word
pub fn has_forbidden_pair_walk(word: &Word) -> bool {
    let letters: Vec<char> = word.letters().collect();
    letters
        .windows(2)
        .any(|pair| forbidden_successors(pair[0]).contains(pair[1]))
}

/// Whether a full-format word is forced to coefficient zero
///
/// True iff the first letter is in the first-entry forbidden set, the last
/// letter is in the single-letter final-entry forbidden set, or a forbidden
/// adjacent pair occurs anywhere.
pub fn is_trivial_zero(word: &Word) -> bool {
    if let Some(first) = word.first() {
        if FIRST_ENTRY
            .iter()
            .any(|rel| rel.contains_fragment(&first.to_string()))
        {
            return true;
        }
    }
    if let Some(last) = word.last() {
        if FINAL_ENTRIES[..3]
            .iter()
            .any(|rel| rel.contains_fragment(&last.to_string()))
        {
            return true;
        }
    }
    has_forbidden_pair_scan(word)
}

/// Single-pass formulation of [`is_trivial_zero`]
///
/// Uses direct letter-set membership and the forbidden-successor map;
/// behaviorally identical to the substring-based test on all words.
pub fn is_trivial_zero_walk(word: &Word) -> bool {
    match (word.first(), word.last()) {
        (Some(first), Some(last)) => {
            "def".contains(first) || "abc".contains(last) || has_forbidden_pair_walk(word)
        }
        _ => false,
    }
}

/// A physical sector, restricting which leading and trailing letters a
/// non-zero word may carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sector {
    /// First letter outside `def`, last outside `abc`
    Phi2,
    /// First letter outside `def`, last outside `def`
    Phi3,
    /// No first/last restriction beyond the adjacency test
    Unrestricted,
}

/// Forbidden leading/trailing letter sets for one sector
#[derive(Clone, Copy, Debug)]
pub struct SectorRules {
    /// Letters a word must not start with
    pub forbidden_first: &'static str,
    /// Letters a word must not end with
    pub forbidden_last: &'static str,
}

impl Sector {
    /// The sector's letter restrictions
    pub fn rules(&self) -> SectorRules {
        match self {
            Sector::Phi2 => SectorRules {
                forbidden_first: "def",
                forbidden_last: "abc",
            },
            Sector::Phi3 => SectorRules {
                forbidden_first: "def",
                forbidden_last: "def",
            },
            Sector::Unrestricted => SectorRules {
                forbidden_first: "",
                forbidden_last: "",
            },
        }
    }
}

/// Whether a word is admissible in a sector: sector letter rules composed
/// with the adjacency walk
pub fn is_admissible(word: &Word, sector: Sector) -> bool {
    let rules = sector.rules();
    match (word.first(), word.last()) {
        (Some(first), Some(last)) => {
            !rules.forbidden_first.contains(first)
                && !rules.forbidden_last.contains(last)
                && !has_forbidden_pair_walk(word)
        }
        _ => false,
    }
}
