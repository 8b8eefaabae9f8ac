//! Relation instances: one relation materialized against one symbol

use std::collections::BTreeMap;

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::symbol::{Symbol, Word};

/// One term of a relation instance
///
/// `symbol_coeff` is `Some(0)` for a word merely absent from the symbol;
/// `None` marks a term the caller has explicitly flagged invalid, which
/// forces the owning instance's sum to the invalid state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceTerm {
    /// The fully substituted candidate word
    pub word: Word,
    /// The symbol's coefficient for that word, if valid
    pub symbol_coeff: Option<Rational64>,
    /// The relation's coefficient for the originating fragment
    pub rel_coeff: Rational64,
}

/// A relation bound to concrete words and symbol coefficients
///
/// Terms keep the order in which the matcher produced them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationInstance {
    terms: Vec<InstanceTerm>,
}

impl RelationInstance {
    /// Create an instance from ordered terms
    pub fn from_terms(terms: Vec<InstanceTerm>) -> Self {
        RelationInstance { terms }
    }

    /// Rehydrate an instance from a persisted word → relation-coefficient
    /// map, looking the symbol coefficients up in `symb`
    pub fn from_coeff_map(map: &BTreeMap<Word, Rational64>, symb: &Symbol) -> Self {
        RelationInstance {
            terms: map
                .iter()
                .map(|(word, rel_coeff)| InstanceTerm {
                    word: word.clone(),
                    symbol_coeff: Some(symb.coeff_of(word)),
                    rel_coeff: *rel_coeff,
                })
                .collect(),
        }
    }

    /// The ordered terms
    pub fn terms(&self) -> &[InstanceTerm] {
        &self.terms
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the instance has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The instance's words paired with relation coefficients, the shape
    /// used for persistence
    pub fn coeff_map(&self) -> BTreeMap<Word, Rational64> {
        self.terms
            .iter()
            .map(|t| (t.word.clone(), t.rel_coeff))
            .collect()
    }

    /// A copy with every symbol coefficient re-looked-up in a new symbol
    ///
    /// Relation coefficients are kept; previously flagged terms become
    /// valid again if the new symbol supplies them.
    pub fn rebind(&self, symb: &Symbol) -> RelationInstance {
        RelationInstance {
            terms: self
                .terms
                .iter()
                .map(|t| InstanceTerm {
                    word: t.word.clone(),
                    symbol_coeff: Some(symb.coeff_of(&t.word)),
                    rel_coeff: t.rel_coeff,
                })
                .collect(),
        }
    }

    /// Explicitly flag a term's symbol coefficient as invalid
    ///
    /// Returns whether the word was found among the terms.
    pub fn mark_invalid(&mut self, word: &Word) -> bool {
        let mut found = false;
        for term in &mut self.terms {
            if term.word == *word {
                term.symbol_coeff = None;
                found = true;
            }
        }
        found
    }

    /// Order-insensitive key used to deduplicate instance batches
    pub(crate) fn canonical(&self) -> Vec<(Word, Option<Rational64>, Rational64)> {
        let mut key: Vec<_> = self
            .terms
            .iter()
            .map(|t| (t.word.clone(), t.symbol_coeff, t.rel_coeff))
            .collect();
        key.sort();
        key
    }
}
