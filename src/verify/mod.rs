//! Relation sums, correctness scoring, and batch assessment

mod assess;

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::algebra::is_trivial_zero;
use crate::matcher::RelationInstance;
use crate::symbol::Symbol;

pub use assess::{assess_by_word, assess_instances, CheckPlan};

/// The outcome of summing one relation instance
///
/// `Invalid` is a tagged state, not a numeric sentinel: a sum forced invalid
/// by an overflow or a flagged term can never be confused with a
/// legitimately zero sum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RelationSum {
    /// The exact value of Σ symbol_coeff · rel_coeff
    Value(Rational64),
    /// The computation was forced invalid
    Invalid,
}

impl RelationSum {
    /// Whether the sum was computed and equals exactly zero
    pub fn is_zero(&self) -> bool {
        matches!(self, RelationSum::Value(v) if v.is_zero())
    }

    /// Whether the computation was forced invalid
    pub fn is_invalid(&self) -> bool {
        matches!(self, RelationSum::Invalid)
    }

    /// The computed value, if any
    pub fn value(&self) -> Option<Rational64> {
        match self {
            RelationSum::Value(v) => Some(*v),
            RelationSum::Invalid => None,
        }
    }
}

/// Sum an instance with exact rational arithmetic
///
/// A term flagged invalid, or any overflow while accumulating, forces
/// `Invalid`; the invalid state absorbs every later term.
pub fn relation_sum(inst: &RelationInstance) -> RelationSum {
    let mut acc = Rational64::zero();
    for term in inst.terms() {
        let symbol_coeff = match term.symbol_coeff {
            Some(c) => c,
            None => return RelationSum::Invalid,
        };
        let prod = match symbol_coeff.checked_mul(&term.rel_coeff) {
            Some(p) => p,
            None => return RelationSum::Invalid,
        };
        acc = match acc.checked_add(&prod) {
            Some(a) => a,
            None => return RelationSum::Invalid,
        };
    }
    RelationSum::Value(acc)
}

/// Sum an instance and count its non-trivial-zero terms
///
/// The count is a diagnostic of how much of the instance lives outside the
/// trivially-vanishing region.
pub fn sum_with_nontrivial_count(inst: &RelationInstance) -> (RelationSum, usize) {
    let nontrivial = inst
        .terms()
        .iter()
        .filter(|t| !is_trivial_zero(&t.word))
        .count();
    (relation_sum(inst), nontrivial)
}

/// Fraction of instances whose sum is exactly zero
///
/// `None` for an empty batch: an absent measurement, not a zero rate. With
/// `p_norm` set, the rate is divided by `p_norm` raised to the batch's term
/// count, normalizing against a per-coefficient prediction accuracy.
pub fn pass_rate(batch: &[RelationInstance], p_norm: Option<f64>) -> Option<f64> {
    if batch.is_empty() {
        return None;
    }
    let passed = batch.iter().filter(|i| relation_sum(i).is_zero()).count();
    let mut rate = passed as f64 / batch.len() as f64;
    if let Some(p) = p_norm {
        rate /= p.powi(batch[0].len() as i32);
    }
    Some(rate)
}

/// Whether per-term correctness additionally requires the zero-sum check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// An instance counts only if its sum passes and every term matches
    #[default]
    RequireSatisfied,
    /// Term correctness alone, without the zero-sum requirement
    Unconditional,
}

/// Per-instance correctness detail
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceBreakdown {
    /// Whether the instance's sum is exactly zero
    pub satisfied: bool,
    /// Terms exactly matching the ground truth
    pub exact: usize,
    /// Terms matching in absolute value
    pub magnitude: usize,
    /// Terms matching in sign
    pub sign: usize,
}

/// Batch correctness rates under the three match notions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoeffScore {
    /// Fraction of instances with every term exactly correct
    pub all_correct: Option<f64>,
    /// Fraction with every term correct in magnitude
    pub mag_correct: Option<f64>,
    /// Fraction with every term correct in sign
    pub sign_correct: Option<f64>,
}

/// Score a batch's coefficients against a ground-truth symbol
///
/// A term with a flagged (invalid) symbol coefficient matches under no
/// notion. Rates are `None` for an empty batch.
pub fn score_against_truth(
    batch: &[RelationInstance],
    truth: &Symbol,
    mode: ScoreMode,
) -> (CoeffScore, Vec<InstanceBreakdown>) {
    let mut breakdowns = Vec::with_capacity(batch.len());
    let (mut n_all, mut n_mag, mut n_sign) = (0usize, 0usize, 0usize);

    for inst in batch {
        let satisfied = relation_sum(inst).is_zero();
        let (mut exact, mut magnitude, mut sign) = (0usize, 0usize, 0usize);

        for term in inst.terms() {
            let predicted = match term.symbol_coeff {
                Some(c) => c,
                None => continue,
            };
            let expected = truth.coeff_of(&term.word);
            if predicted == expected {
                exact += 1;
            }
            if predicted.abs() == expected.abs() {
                magnitude += 1;
            }
            if predicted.signum() == expected.signum() {
                sign += 1;
            }
        }

        let nterm = inst.len();
        let counts = satisfied || mode == ScoreMode::Unconditional;
        if counts && exact == nterm {
            n_all += 1;
        }
        if counts && magnitude == nterm {
            n_mag += 1;
        }
        if counts && sign == nterm {
            n_sign += 1;
        }

        breakdowns.push(InstanceBreakdown {
            satisfied,
            exact,
            magnitude,
            sign,
        });
    }

    let score = if batch.is_empty() {
        CoeffScore {
            all_correct: None,
            mag_correct: None,
            sign_correct: None,
        }
    } else {
        let total = batch.len() as f64;
        CoeffScore {
            all_correct: Some(n_all as f64 / total),
            mag_correct: Some(n_mag as f64 / total),
            sign_correct: Some(n_sign as f64 / total),
        }
    };
    (score, breakdowns)
}

/// Aggregate assessment of one relation-table entry
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationScore {
    /// Fraction of instances summing to exactly zero
    pub pass_rate: Option<f64>,
    /// Fraction with every coefficient exactly correct
    pub all_correct: Option<f64>,
    /// Fraction with every coefficient correct in magnitude
    pub mag_correct: Option<f64>,
    /// Fraction with every coefficient correct in sign
    pub sign_correct: Option<f64>,
    /// Number of relation instances in the batch
    pub instances: usize,
}

impl RelationScore {
    /// Score a batch, optionally against a ground truth symbol
    pub fn from_batch(
        batch: &[RelationInstance],
        truth: Option<&Symbol>,
        p_norm: Option<f64>,
        mode: ScoreMode,
    ) -> Self {
        let coeffs = truth.map(|t| score_against_truth(batch, t, mode).0);
        RelationScore {
            pass_rate: pass_rate(batch, p_norm),
            all_correct: coeffs.and_then(|c| c.all_correct),
            mag_correct: coeffs.and_then(|c| c.mag_correct),
            sign_correct: coeffs.and_then(|c| c.sign_correct),
            instances: batch.len(),
        }
    }
}
