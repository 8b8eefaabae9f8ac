//! Batch assessment drivers
//!
//! The word-oriented driver samples words from the symbol under test and
//! matches relations in place; the relation-oriented driver consumes
//! pre-generated instance batches (usually read back from disk). Both share
//! the scoring in the parent module.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{RelationScore, ScoreMode};
use crate::algebra::RelationFamily;
use crate::matcher::{sample_matches, RelationInstance, SlotPolicy};
use crate::symbol::{Symbol, WordFormat};
use crate::{AmpRelsError, Result};

/// Which relations to check and how much of the symbol to sample for each
///
/// Fractions are per table entry, in table order; an entry's fraction of 0
/// skips it. Families absent from the map are not checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckPlan {
    /// Sampling fraction per entry, keyed by family
    pub fractions: BTreeMap<RelationFamily, Vec<f64>>,
    /// Optional per-coefficient accuracy normalizer for pass rates
    pub p_norm: Option<f64>,
    /// Seed for the word draws
    pub seed: u64,
    /// Whether correctness requires the zero-sum check
    pub mode: ScoreMode,
}

impl CheckPlan {
    /// The default checks for full-format symbols
    pub fn full_default() -> Self {
        let mut fractions = BTreeMap::new();
        fractions.insert(RelationFamily::First, vec![0.1; 3]);
        fractions.insert(RelationFamily::Double, vec![0.1; 3]);
        fractions.insert(RelationFamily::Triple, vec![0.1]);
        fractions.insert(RelationFamily::Final, vec![0.1; 29]);
        fractions.insert(RelationFamily::Integral, vec![0.01; 3]);
        CheckPlan {
            fractions,
            p_norm: None,
            seed: 0,
            mode: ScoreMode::RequireSatisfied,
        }
    }

    /// The default checks for compact-format symbols
    ///
    /// Final-entry relations live across the compact seam and cannot be
    /// checked there.
    pub fn compact_default() -> Self {
        let mut plan = Self::full_default();
        plan.fractions.remove(&RelationFamily::Final);
        plan
    }

    /// Validate fractions against the family tables
    pub fn validate(&self) -> Result<()> {
        for (family, fracs) in &self.fractions {
            if fracs.len() > family.table().len() {
                return Err(AmpRelsError::InvalidArgument(format!(
                    "{} fractions for family '{}' with {} entries",
                    fracs.len(),
                    family,
                    family.table().len()
                )));
            }
            if fracs.iter().any(|f| !(0.0..=1.0).contains(f)) {
                return Err(AmpRelsError::InvalidArgument(format!(
                    "sampling fraction out of [0, 1] for family '{}'",
                    family
                )));
            }
        }
        if let Some(p) = self.p_norm {
            if p <= 0.0 {
                return Err(AmpRelsError::InvalidArgument(
                    "p_norm must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for CheckPlan {
    fn default() -> Self {
        Self::full_default()
    }
}

/// Assess a symbol against the planned relations, sampling words in place
///
/// Returns `{entry id -> score}`. Entries run in parallel; they share only
/// the read-only tables. A set cancellation flag makes remaining entries
/// report nothing; already finished entries are kept. Entries whose slot is
/// not defined for the format (final-entry checks on quad symbols) are
/// skipped with a warning rather than failing the batch.
pub fn assess_by_word(
    symb: &Symbol,
    truth: Option<&Symbol>,
    plan: &CheckPlan,
    format: WordFormat,
    cancel: Option<&AtomicBool>,
) -> Result<BTreeMap<String, RelationScore>> {
    plan.validate()?;

    let entries: Vec<(RelationFamily, usize, f64)> = plan
        .fractions
        .iter()
        .flat_map(|(family, fracs)| {
            fracs
                .iter()
                .enumerate()
                .map(move |(i, frac)| (*family, i, *frac))
        })
        .collect();
    info!(
        entries = entries.len(),
        %format,
        "assessing relations via word sampling"
    );

    let results: Vec<Result<Option<(String, RelationScore)>>> = entries
        .par_iter()
        .map(|&(family, index, fraction)| {
            if cancel.map(|c| c.load(Ordering::Relaxed)).unwrap_or(false) {
                return Ok(None);
            }
            let id = family.entry_id(index);
            let slot = family.slot();
            if slot == SlotPolicy::Final && format == WordFormat::Quad {
                warn!(entry = %id, "final-slot relations undefined for compact formats; skipped");
                return Ok(None);
            }
            let rel = &family.table()[index];
            let batch = sample_matches(symb, fraction, rel, slot, format, plan.seed)?;
            let score = RelationScore::from_batch(&batch, truth, plan.p_norm, plan.mode);
            debug!(entry = %id, instances = score.instances, "entry assessed");
            Ok(Some((id, score)))
        })
        .collect();

    let mut scores = BTreeMap::new();
    for result in results {
        if let Some((id, score)) = result? {
            scores.insert(id, score);
        }
    }
    Ok(scores)
}

/// Assess pre-generated instance batches against a symbol
///
/// Every instance is rebound to the symbol under test before scoring, so
/// batches read back from disk or produced against an older symbol can be
/// reused directly.
pub fn assess_instances(
    batches: &[(String, Vec<RelationInstance>)],
    symb: &Symbol,
    truth: Option<&Symbol>,
    p_norm: Option<f64>,
    mode: ScoreMode,
) -> BTreeMap<String, RelationScore> {
    info!(batches = batches.len(), "assessing stored relation instances");
    batches
        .par_iter()
        .map(|(id, batch)| {
            let rebound: Vec<RelationInstance> =
                batch.iter().map(|inst| inst.rebind(symb)).collect();
            let score = RelationScore::from_batch(&rebound, truth, p_norm, mode);
            (id.clone(), score)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Rational64;
    use crate::symbol::Word;

    fn symb(pairs: &[(&str, i64)]) -> Symbol {
        pairs
            .iter()
            .map(|(w, c)| (Word::new(*w), Rational64::from(*c)))
            .collect()
    }

    #[test]
    fn test_plan_validation() {
        assert!(CheckPlan::full_default().validate().is_ok());

        let mut plan = CheckPlan::full_default();
        plan.fractions.insert(RelationFamily::Triple, vec![0.1; 5]);
        assert!(plan.validate().is_err());

        let mut plan = CheckPlan::full_default();
        plan.fractions.insert(RelationFamily::First, vec![1.5]);
        assert!(plan.validate().is_err());

        let mut plan = CheckPlan::full_default();
        plan.p_norm = Some(0.0);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_assess_first_entry_rates() {
        // trivial-zero words carrying coefficient 0 satisfy the first-entry
        // relations; a nonzero coefficient on 'dxyz' fails them
        let s = symb(&[("dabc", 0), ("eabc", 0), ("fabc", 1), ("aabc", 7)]);
        let mut plan = CheckPlan {
            fractions: BTreeMap::new(),
            p_norm: None,
            seed: 0,
            mode: ScoreMode::RequireSatisfied,
        };
        plan.fractions.insert(RelationFamily::First, vec![1.0; 3]);

        let scores = assess_by_word(&s, Some(&s), &plan, WordFormat::Full, None).unwrap();
        assert_eq!(scores.len(), 3);
        // first0 matches 'dabc' only: passes
        assert_eq!(scores["first0"].pass_rate, Some(1.0));
        assert_eq!(scores["first0"].instances, 1);
        // first2 matches 'fabc' with coefficient 1: fails
        assert_eq!(scores["first2"].pass_rate, Some(0.0));
        // scored against itself, coefficients agree wherever sums pass
        assert_eq!(scores["first0"].all_correct, Some(1.0));
        assert_eq!(scores["first2"].all_correct, Some(0.0));
    }

    #[test]
    fn test_assess_skips_final_on_quad() {
        let s = symb(&[("habc", 1)]);
        let mut plan = CheckPlan::full_default();
        plan.fractions = BTreeMap::new();
        plan.fractions.insert(RelationFamily::Final, vec![1.0]);

        let scores = assess_by_word(&s, None, &plan, WordFormat::Quad, None).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_assess_cancellation() {
        let s = symb(&[("dabc", 0)]);
        let mut plan = CheckPlan::full_default();
        plan.fractions = BTreeMap::new();
        plan.fractions.insert(RelationFamily::First, vec![1.0; 3]);

        let cancel = AtomicBool::new(true);
        let scores = assess_by_word(&s, None, &plan, WordFormat::Full, Some(&cancel)).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_assess_instances_rebinds() {
        let rel_map: BTreeMap<Word, Rational64> = [
            (Word::new("ab"), Rational64::from(1)),
            (Word::new("ba"), Rational64::from(-1)),
        ]
        .into_iter()
        .collect();
        let stale = Symbol::new();
        let inst = RelationInstance::from_coeff_map(&rel_map, &stale);
        let batches = vec![("integral0".to_string(), vec![inst])];

        // fresh symbol satisfies the relation
        let fresh = symb(&[("ab", 3), ("ba", 3)]);
        let scores = assess_instances(&batches, &fresh, None, None, ScoreMode::default());
        assert_eq!(scores["integral0"].pass_rate, Some(1.0));
        assert_eq!(scores["integral0"].instances, 1);
    }
}
