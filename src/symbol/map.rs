//! The symbol map and its term screening

use std::collections::{BTreeMap, BTreeSet};

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use super::{Word, WordFormat};

/// A mapping from words to exact rational coefficients
///
/// Represents a ground truth or a model prediction. Lookup of an absent word
/// yields coefficient 0 by convention, never an error. Iteration order is
/// the lexicographic order of the words, so every batch operation built on a
/// symbol is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol {
    terms: BTreeMap<Word, Rational64>,
}

impl Symbol {
    /// Create an empty symbol
    pub fn new() -> Self {
        Symbol {
            terms: BTreeMap::new(),
        }
    }

    /// Insert or replace a term
    pub fn insert(&mut self, word: Word, coeff: Rational64) {
        self.terms.insert(word, coeff);
    }

    /// Remove a term, returning its coefficient if present
    pub fn remove(&mut self, word: &Word) -> Option<Rational64> {
        self.terms.remove(word)
    }

    /// Coefficient of a word, 0 if absent
    pub fn coeff_of(&self, word: &Word) -> Rational64 {
        self.terms
            .get(word)
            .copied()
            .unwrap_or_else(|| Rational64::from(0))
    }

    /// Coefficient of a word, `None` if absent
    pub fn get(&self, word: &Word) -> Option<&Rational64> {
        self.terms.get(word)
    }

    /// Whether the word has an explicit term
    pub fn contains(&self, word: &Word) -> bool {
        self.terms.contains_key(word)
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the symbol has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate over (word, coefficient) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &Rational64)> {
        self.terms.iter()
    }

    /// Iterate over the words
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.terms.keys()
    }

    /// All words carrying a given coefficient
    pub fn words_with_coeff(&self, coeff: Rational64) -> BTreeSet<Word> {
        self.terms
            .iter()
            .filter(|(_, c)| **c == coeff)
            .map(|(w, _)| w.clone())
            .collect()
    }

    /// Terms whose word is not legitimate for the format
    pub fn find_nonwords(&self, format: WordFormat) -> BTreeMap<Word, Rational64> {
        self.terms
            .iter()
            .filter(|(w, _)| !w.is_valid(format))
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// Terms whose coefficient is not an integer
    pub fn find_noncoeffs(&self) -> BTreeMap<Word, Rational64> {
        self.terms
            .iter()
            .filter(|(_, c)| !c.is_integer())
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// Terms that are nonwords, noncoeffs, or both; overlap counted once
    pub fn find_nonterms(&self, format: WordFormat) -> BTreeMap<Word, Rational64> {
        self.terms
            .iter()
            .filter(|(w, c)| !w.is_valid(format) || !c.is_integer())
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// Fraction of terms that are nonterms, between 0 and 1
    pub fn count_nonterms(&self, format: WordFormat) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }
        self.find_nonterms(format).len() as f64 / self.terms.len() as f64
    }

    /// Delete every nonterm in place, returning how many were removed
    pub fn remove_nonterms(&mut self, format: WordFormat) -> usize {
        let offenders = self.find_nonterms(format);
        for word in offenders.keys() {
            self.terms.remove(word);
        }
        offenders.len()
    }

    /// The trivial-zero words of this symbol, with their current coefficients
    ///
    /// Assumes full-format words; see [`crate::algebra::is_trivial_zero`].
    pub fn trivial_zero_terms(&self) -> BTreeMap<Word, Rational64> {
        self.terms
            .iter()
            .filter(|(w, _)| crate::algebra::is_trivial_zero(w))
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// A copy with every trivial-zero word's coefficient forced to 0
    pub fn with_trivial_zeros_cleared(&self) -> Symbol {
        let mut out = self.clone();
        for (word, coeff) in out.terms.iter_mut() {
            if crate::algebra::is_trivial_zero(word) {
                *coeff = Rational64::from(0);
            }
        }
        out
    }
}

impl FromIterator<(Word, Rational64)> for Symbol {
    fn from_iter<I: IntoIterator<Item = (Word, Rational64)>>(iter: I) -> Self {
        Symbol {
            terms: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Symbol {
    type Item = (&'a Word, &'a Rational64);
    type IntoIter = std::collections::btree_map::Iter<'a, Word, Rational64>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
