//! Static look-up tables for the homogeneous linear relation families
//!
//! Built once behind `Lazy` and shared read-only for the life of the
//! process. Fragment constants and coefficients follow the defining
//! equations of the three-point form factor; half-integer coefficients are
//! exact rationals.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::relation::{table_orbit, Relation};
use crate::matcher::SlotPolicy;
use crate::{AmpRelsError, Result};

/// First entry condition: forbidden leading letters
pub static FIRST_ENTRY: Lazy<Vec<Relation>> = Lazy::new(|| {
    vec![
        Relation::of_ints(&[("d", 1)]),
        Relation::of_ints(&[("e", 1)]),
        Relation::of_ints(&[("f", 1)]),
    ]
});

/// Double-adjacency condition, any slot; closes under the dihedral action
pub static DOUBLE_ADJACENCY: Lazy<Vec<Relation>> = Lazy::new(|| {
    vec![
        Relation::of_ints(&[("de", 1)]),
        Relation::of_ints(&[("ad", 1)]),
        Relation::of_ints(&[("da", 1)]),
    ]
});

/// Triple-adjacency relation, any slot
pub static TRIPLE_ADJACENCY: Lazy<Vec<Relation>> =
    Lazy::new(|| vec![Relation::of_ints(&[("aab", 1), ("abb", 1), ("acb", 1)])]);

/// Integrability relations, any slot; the 14-term entry dominates run time
pub static INTEGRABILITY: Lazy<Vec<Relation>> = Lazy::new(|| {
    vec![
        Relation::of_ints(&[("ab", 1), ("ac", 1), ("ba", -1), ("ca", -1)]),
        Relation::of_ints(&[("ca", 1), ("cb", 1), ("ac", -1), ("bc", -1)]),
        Relation::of_ints(&[
            ("db", 1),
            ("dc", -1),
            ("bd", -1),
            ("cd", 1),
            ("ec", 1),
            ("ea", -1),
            ("ce", -1),
            ("ae", 1),
            ("fa", 1),
            ("fb", -1),
            ("af", -1),
            ("bf", 1),
            ("cb", 2),
            ("bc", -2),
        ]),
    ]
});

/// Multi-final-entries relations: one-term entries first, then short
/// (≤ 4 terms), then long ones
pub static FINAL_ENTRIES: Lazy<Vec<Relation>> = Lazy::new(|| {
    vec![
        Relation::of_ints(&[("a", 1)]),
        Relation::of_ints(&[("b", 1)]),
        Relation::of_ints(&[("c", 1)]),
        Relation::of_ints(&[("ad", 1)]),
        Relation::of_ints(&[("ed", 1)]),
        Relation::of_ints(&[("add", 1)]),
        Relation::of_ints(&[("abd", 1)]),
        Relation::of_ints(&[("ace", 1)]),
        Relation::of_ints(&[("ebd", 1)]),
        Relation::of_ints(&[("edd", 1)]),
        Relation::of_ints(&[("addd", 1)]),
        Relation::of_ints(&[("abbd", 1)]),
        Relation::of_ints(&[("adbd", 1)]),
        Relation::of_ints(&[("cbbd", 1)]),
        Relation::of_ints(&[("ebbd", 1)]),
        Relation::of_ints(&[("ebdd", 1)]),
        Relation::of_ints(&[("edbd", 1)]),
        Relation::of_ints(&[("eddd", 1)]),
        Relation::of_ints(&[("fdbd", 1)]),
        Relation::of_ints(&[("bf", 1), ("bd", -1)]),
        Relation::of_ints(&[("cdd", 1), ("cee", 1)]),
        Relation::of_ints(&[("ddbd", 1), ("dbdd", -1)]),
        Relation::of_ints(&[("cbdd", 1), ("cdbd", -1)]),
        Relation::of_ints(&[("fbd", 1), ("dbd", -1), ("bdd", 1)]),
        Relation::of_ints(&[
            ("bddd", 1),
            ("faff", 1),
            ("dbdd", -1),
            ("eaff", -1),
            ("fbdd", 1),
            ("aeee", -1),
        ]),
        Relation::of_ratios(&[
            ("abdd", (1, 1)),
            ("cddd", (-1, 2)),
            ("dcee", (-1, 2)),
            ("aeee", (1, 2)),
            ("eaff", (1, 2)),
            ("faff", (-1, 2)),
            ("ecee", (1, 2)),
        ]),
        Relation::of_ratios(&[
            ("cbdd", (1, 1)),
            ("bfff", (-1, 2)),
            ("dcee", (1, 2)),
            ("ecee", (-1, 2)),
            ("cddd", (1, 2)),
            ("dbdd", (1, 2)),
            ("fbdd", (-1, 2)),
        ]),
        Relation::of_ratios(&[
            ("cdbd", (1, 1)),
            ("bfff", (-1, 2)),
            ("dcee", (1, 2)),
            ("ecee", (-1, 2)),
            ("cddd", (1, 2)),
            ("dbdd", (1, 2)),
            ("fbdd", (-1, 2)),
        ]),
        Relation::of_ratios(&[
            ("fbbd", (1, 1)),
            ("dbbd", (-1, 1)),
            ("bbdd", (1, 1)),
            ("faff", (-1, 2)),
            ("dbdd", (1, 2)),
            ("fbdd", (-1, 2)),
            ("eaff", (1, 2)),
            ("aeee", (1, 2)),
            ("bfff", (-1, 2)),
        ]),
    ]
});

/// Multi-initial-entries relations: one-term entries first, then short,
/// then long ones
pub static INITIAL_ENTRIES: Lazy<Vec<Relation>> = Lazy::new(|| {
    vec![
        Relation::of_ints(&[("ad", 1)]),
        Relation::of_ints(&[("aad", 1)]),
        Relation::of_ints(&[("bcf", 1)]),
        Relation::of_ints(&[("bde", 1)]),
        Relation::of_ints(&[("bdf", 1)]),
        Relation::of_ints(&[("bda", 1)]),
        Relation::of_ints(&[("abd", 1)]),
        Relation::of_ints(&[("cb", 1), ("bc", -1)]),
        Relation::of_ints(&[("cd", 1), ("bd", -1)]),
        Relation::of_ints(&[("aaf", 1), ("bbf", 1), ("abf", -1)]),
        Relation::of_ints(&[("aab", 1), ("aac", 1), ("cca", 1), ("bba", -1), ("aba", -1)]),
        Relation::of_ints(&[("bba", 1), ("bbc", 1), ("ccb", 1), ("aab", -1), ("abb", -1)]),
        Relation::of_ints(&[("abc", 1), ("aac", 1), ("bbc", 1), ("cca", 1), ("ccb", 1)]),
        Relation::of_ratios(&[
            ("aac", (1, 1)),
            ("cca", (1, 1)),
            ("bbc", (-1, 1)),
            ("ccb", (-1, 1)),
            ("afa", (1, 2)),
            ("aaf", (-1, 2)),
            ("bbf", (1, 2)),
            ("afb", (-1, 2)),
        ]),
    ]
});

/// Dihedral orbit of the double-adjacency table: the twelve forbidden
/// adjacent pairs, used by the trivial-zero classifier
pub static DOUBLE_ADJACENCY_ORBIT: Lazy<Vec<Relation>> = Lazy::new(|| {
    table_orbit(&DOUBLE_ADJACENCY).expect("double-adjacency table is pure base-alphabet")
});

/// One physically-derived identity family
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationFamily {
    /// Forbidden leading letters
    First,
    /// Richer prefix identities
    Initial,
    /// Forbidden adjacent pairs
    Double,
    /// Related adjacent triples
    Triple,
    /// Any-position two-letter identities
    Integral,
    /// Forbidden trailing letters and longer suffix identities
    Final,
}

impl RelationFamily {
    /// All families in table order
    pub fn all() -> [RelationFamily; 6] {
        [
            RelationFamily::First,
            RelationFamily::Initial,
            RelationFamily::Double,
            RelationFamily::Triple,
            RelationFamily::Integral,
            RelationFamily::Final,
        ]
    }

    /// The family's base relation table
    pub fn table(&self) -> &'static [Relation] {
        match self {
            RelationFamily::First => &FIRST_ENTRY,
            RelationFamily::Initial => &INITIAL_ENTRIES,
            RelationFamily::Double => &DOUBLE_ADJACENCY,
            RelationFamily::Triple => &TRIPLE_ADJACENCY,
            RelationFamily::Integral => &INTEGRABILITY,
            RelationFamily::Final => &FINAL_ENTRIES,
        }
    }

    /// Where the family's patterns may be matched within a word
    pub fn slot(&self) -> SlotPolicy {
        match self {
            RelationFamily::First => SlotPolicy::First,
            RelationFamily::Initial => SlotPolicy::Initial,
            RelationFamily::Double | RelationFamily::Triple | RelationFamily::Integral => {
                SlotPolicy::Any
            }
            RelationFamily::Final => SlotPolicy::Final,
        }
    }

    /// Entry identifier used in score maps and persisted filenames
    pub fn entry_id(&self, index: usize) -> String {
        format!("{}{}", self, index)
    }
}

impl fmt::Display for RelationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationFamily::First => "first",
            RelationFamily::Initial => "initial",
            RelationFamily::Double => "double",
            RelationFamily::Triple => "triple",
            RelationFamily::Integral => "integral",
            RelationFamily::Final => "final",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RelationFamily {
    type Err = AmpRelsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(RelationFamily::First),
            "initial" => Ok(RelationFamily::Initial),
            "double" => Ok(RelationFamily::Double),
            "triple" => Ok(RelationFamily::Triple),
            "integral" => Ok(RelationFamily::Integral),
            "final" => Ok(RelationFamily::Final),
            other => Err(AmpRelsError::InvalidArgument(format!(
                "unknown relation family '{}'",
                other
            ))),
        }
    }
}
