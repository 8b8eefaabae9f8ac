//! Relations and their dihedral orbits

use std::collections::{BTreeMap, BTreeSet};

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use super::dihedral::{image, GROUP_ORDER};
use crate::symbol::Word;
use crate::Result;

/// A linear combination of word fragments asserted to sum to zero
///
/// Terms are (fragment, coefficient) pairs in a fixed order; coefficients
/// are rational constants frozen at construction. Every fragment of one
/// relation has the same length; this is a caller precondition of the
/// matcher, not checked at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    terms: Vec<(Word, Rational64)>,
}

impl Relation {
    /// Create a relation from (fragment, coefficient) terms
    pub fn from_terms(terms: impl IntoIterator<Item = (Word, Rational64)>) -> Self {
        Relation {
            terms: terms.into_iter().collect(),
        }
    }

    /// Convenience constructor from string fragments and integer coefficients
    pub fn of_ints(pairs: &[(&str, i64)]) -> Self {
        Relation::from_terms(
            pairs
                .iter()
                .map(|(w, c)| (Word::new(*w), Rational64::from(*c))),
        )
    }

    /// Convenience constructor allowing rational coefficients
    pub fn of_ratios(pairs: &[(&str, (i64, i64))]) -> Self {
        Relation::from_terms(
            pairs
                .iter()
                .map(|(w, (n, d))| (Word::new(*w), Rational64::new(*n, *d))),
        )
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the relation has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Length of the (uniform) fragment keys
    pub fn fragment_len(&self) -> usize {
        self.terms.first().map(|(w, _)| w.len()).unwrap_or(0)
    }

    /// Iterate over (fragment, coefficient) terms
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &Rational64)> {
        self.terms.iter().map(|(w, c)| (w, c))
    }

    /// Coefficient of a fragment, if present
    pub fn coeff_of(&self, fragment: &str) -> Option<Rational64> {
        self.terms
            .iter()
            .find(|(w, _)| w.as_str() == fragment)
            .map(|(_, c)| *c)
    }

    /// Whether a fragment appears among the terms
    pub fn contains_fragment(&self, fragment: &str) -> bool {
        self.coeff_of(fragment).is_some()
    }

    /// Canonical (fragment, coefficient) pair-set, used for orbit dedup
    pub(crate) fn canonical(&self) -> BTreeMap<Word, Rational64> {
        self.terms.iter().cloned().collect()
    }
}

/// The deduplicated dihedral orbit of one relation
///
/// Each group element is applied to every fragment simultaneously, keeping
/// relative coefficients; two images are the same relation when their
/// (fragment, coefficient) pair-sets are set-equal. The identity row
/// guarantees at least one element; relations fixed by a non-trivial
/// stabilizer yield strictly fewer than six.
pub fn relation_orbit(rel: &Relation) -> Result<Vec<Relation>> {
    let mut orbit = Vec::new();
    let mut seen = BTreeSet::new();
    for row in 0..GROUP_ORDER {
        let image_rel = Relation::from_terms(
            rel.iter()
                .map(|(frag, coeff)| Ok((image(frag, row)?, *coeff)))
                .collect::<Result<Vec<_>>>()?,
        );
        if seen.insert(image_rel.canonical()) {
            orbit.push(image_rel);
        }
    }
    Ok(orbit)
}

/// The orbit of a whole relation table, deduplicated across the table
///
/// Per-relation orbits are concatenated in table order; an image already
/// produced by an earlier relation is dropped.
pub fn table_orbit(table: &[Relation]) -> Result<Vec<Relation>> {
    let mut orbit = Vec::new();
    let mut seen = BTreeSet::new();
    for rel in table {
        for image_rel in relation_orbit(rel)? {
            if seen.insert(image_rel.canonical()) {
                orbit.push(image_rel);
            }
        }
    }
    Ok(orbit)
}
