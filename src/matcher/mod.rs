//! Slot-aware pattern matching of relations inside words

mod instance;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::algebra::Relation;
use crate::symbol::{find_all, Symbol, Word, WordFormat};
use crate::{AmpRelsError, Result};

pub use instance::{InstanceTerm, RelationInstance};

/// Where within a word a relation's pattern may be matched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Only the leading fragment (first-entry conditions)
    First,
    /// Only the leading fragment (multi-initial-entry identities)
    Initial,
    /// Only the trailing fragment; full format only
    Final,
    /// Every position; substitution at each occurrence
    Any,
}

impl fmt::Display for SlotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotPolicy::First => "first",
            SlotPolicy::Initial => "initial",
            SlotPolicy::Final => "final",
            SlotPolicy::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SlotPolicy {
    type Err = AmpRelsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(SlotPolicy::First),
            "initial" => Ok(SlotPolicy::Initial),
            "final" => Ok(SlotPolicy::Final),
            "any" => Ok(SlotPolicy::Any),
            other => Err(AmpRelsError::InvalidArgument(format!(
                "unknown slot policy '{}'",
                other
            ))),
        }
    }
}

/// Every valid instantiation of a relation's pattern within one word
///
/// The symbol supplies the coefficient of each candidate word (0 when
/// absent). All fragments of `rel` must share one length; this is a caller
/// precondition. Final-slot matching on the quad format is unsupported,
/// since the relevant trailing letters are hidden inside the prefix
/// convention.
pub fn match_in_word(
    word: &Word,
    rel: &Relation,
    slot: SlotPolicy,
    format: WordFormat,
    symb: &Symbol,
) -> Result<Vec<RelationInstance>> {
    let n = rel.fragment_len();
    if n == 0 {
        return Ok(Vec::new());
    }

    match slot {
        SlotPolicy::First | SlotPolicy::Initial => {
            // skip exactly one prefix letter for compact words
            let body = word.body(format);
            let lead = match body.get(..n) {
                Some(lead) => lead,
                None => return Ok(Vec::new()),
            };
            match rel.coeff_of(lead) {
                Some(rel_coeff) => Ok(vec![RelationInstance::from_terms(vec![InstanceTerm {
                    word: word.clone(),
                    symbol_coeff: Some(symb.coeff_of(word)),
                    rel_coeff,
                }])]),
                None => Ok(Vec::new()),
            }
        }

        SlotPolicy::Final => {
            if format == WordFormat::Quad {
                return Err(AmpRelsError::Unsupported(
                    "final-slot matching is not defined for compact formats".into(),
                ));
            }
            if word.len() < n {
                return Ok(Vec::new());
            }
            let split = word.len() - n;
            let (stem, tail) = match (word.as_str().get(..split), word.as_str().get(split..)) {
                (Some(stem), Some(tail)) => (stem, tail),
                _ => return Ok(Vec::new()),
            };
            if !rel.contains_fragment(tail) {
                return Ok(Vec::new());
            }
            let terms = rel
                .iter()
                .map(|(frag, rel_coeff)| {
                    let candidate = Word::new(format!("{}{}", stem, frag));
                    InstanceTerm {
                        symbol_coeff: Some(symb.coeff_of(&candidate)),
                        word: candidate,
                        rel_coeff: *rel_coeff,
                    }
                })
                .collect();
            Ok(vec![RelationInstance::from_terms(terms)])
        }

        SlotPolicy::Any => {
            // strip the compact prefix; it is reattached to every candidate
            let (prefix, body) = match format {
                WordFormat::Full => ("", word.as_str()),
                WordFormat::Quad => match word.first() {
                    Some(first) => word.as_str().split_at(first.len_utf8()),
                    None => ("", ""),
                },
            };
            let mut instances = Vec::new();
            for (frag, _) in rel.iter() {
                for start in find_all(body, frag.as_str()) {
                    let pre = &body[..start];
                    let post = &body[start + n..];
                    let terms = rel
                        .iter()
                        .map(|(sub, rel_coeff)| {
                            let candidate =
                                Word::new(format!("{}{}{}{}", prefix, pre, sub, post));
                            InstanceTerm {
                                symbol_coeff: Some(symb.coeff_of(&candidate)),
                                word: candidate,
                                rel_coeff: *rel_coeff,
                            }
                        })
                        .collect();
                    instances.push(RelationInstance::from_terms(terms));
                }
            }
            Ok(instances)
        }
    }
}

/// Match a relation against a seeded random fraction of a symbol's words
///
/// Draws `⌊fraction · |symb|⌋` distinct words, matches each, and returns the
/// instance batch deduplicated in first-seen order. A fraction of 0 (or an
/// empty symbol) yields an empty batch.
pub fn sample_matches(
    symb: &Symbol,
    fraction: f64,
    rel: &Relation,
    slot: SlotPolicy,
    format: WordFormat,
    seed: u64,
) -> Result<Vec<RelationInstance>> {
    let num_words = (symb.len() as f64 * fraction) as usize;
    if num_words == 0 {
        return Ok(Vec::new());
    }

    let words: Vec<&Word> = symb.words().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let sampled: Vec<&Word> = words
        .choose_multiple(&mut rng, num_words)
        .copied()
        .collect();

    let mut batch = Vec::new();
    let mut seen = HashSet::new();
    for word in sampled {
        for inst in match_in_word(word, rel, slot, format, symb)? {
            if seen.insert(inst.canonical()) {
                batch.push(inst);
            }
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Rational64;

    fn symb(pairs: &[(&str, i64)]) -> Symbol {
        pairs
            .iter()
            .map(|(w, c)| (Word::new(*w), Rational64::from(*c)))
            .collect()
    }

    #[test]
    fn test_slot_policy_parsing() {
        assert_eq!("any".parse::<SlotPolicy>().unwrap(), SlotPolicy::Any);
        assert!("middle".parse::<SlotPolicy>().is_err());
    }

    #[test]
    fn test_first_slot_match() {
        let rel = Relation::of_ints(&[("d", 1)]);
        let s = symb(&[("dabc", 3)]);

        let hits = match_in_word(
            &Word::new("dabc"),
            &rel,
            SlotPolicy::First,
            WordFormat::Full,
            &s,
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].terms().len(), 1);
        assert_eq!(hits[0].terms()[0].rel_coeff, Rational64::from(1));
        assert_eq!(hits[0].terms()[0].symbol_coeff, Some(Rational64::from(3)));

        let misses = match_in_word(
            &Word::new("aabc"),
            &rel,
            SlotPolicy::First,
            WordFormat::Full,
            &s,
        )
        .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn test_first_slot_skips_quad_prefix() {
        let rel = Relation::of_ints(&[("d", 1)]);
        let s = Symbol::new();
        // prefix 'h' must be ignored: body starts with 'd'
        let hits = match_in_word(
            &Word::new("hdab"),
            &rel,
            SlotPolicy::First,
            WordFormat::Quad,
            &s,
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].terms()[0].word, Word::new("hdab"));

        // a word whose prefix letter is 'd' but body is not must miss
        let misses = match_in_word(
            &Word::new("dabc"),
            &rel,
            SlotPolicy::First,
            WordFormat::Quad,
            &s,
        )
        .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn test_final_slot_substitutes_every_fragment() {
        let rel = Relation::of_ints(&[("a", 1), ("b", 1), ("c", 1)]);
        let s = Symbol::new();

        let hits = match_in_word(
            &Word::new("abca"),
            &rel,
            SlotPolicy::Final,
            WordFormat::Full,
            &s,
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        let words: Vec<&str> = hits[0].terms().iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["abca", "abcb", "abcc"]);
        for term in hits[0].terms() {
            assert_eq!(term.rel_coeff, Rational64::from(1));
        }

        // tail 'd' matches no fragment
        let misses = match_in_word(
            &Word::new("abcd"),
            &rel,
            SlotPolicy::Final,
            WordFormat::Full,
            &s,
        )
        .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn test_final_slot_unsupported_for_quad() {
        let rel = Relation::of_ints(&[("a", 1)]);
        let err = match_in_word(
            &Word::new("habc"),
            &rel,
            SlotPolicy::Final,
            WordFormat::Quad,
            &Symbol::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AmpRelsError::Unsupported(_)));
    }

    #[test]
    fn test_any_slot_every_position() {
        let rel = Relation::of_ints(&[("ab", 1), ("ba", -1)]);
        let s = symb(&[("abab", 2), ("bbab", -2)]);

        let hits = match_in_word(
            &Word::new("abab"),
            &rel,
            SlotPolicy::Any,
            WordFormat::Full,
            &s,
        )
        .unwrap();
        // 'ab' at 0 and 2, 'ba' at 1: three independent instances
        assert_eq!(hits.len(), 3);
        for inst in &hits {
            assert_eq!(inst.terms().len(), 2);
        }
        // the 'ba'-at-1 instance substitutes both fragments at position 1
        let words: Vec<&str> = hits[2].terms().iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["aabb", "abab"]);
    }

    #[test]
    fn test_any_slot_reattaches_quad_prefix() {
        let rel = Relation::of_ints(&[("ab", 1), ("ba", -1)]);
        let s = Symbol::new();

        let hits = match_in_word(
            &Word::new("habc"),
            &rel,
            SlotPolicy::Any,
            WordFormat::Quad,
            &s,
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        let words: Vec<&str> = hits[0].terms().iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["habc", "hbac"]);
    }

    #[test]
    fn test_sample_matches_dedups() {
        let rel = Relation::of_ints(&[("d", 1)]);
        let s = symb(&[("dabc", 1), ("dbcd", 2), ("aabc", 3)]);

        let batch =
            sample_matches(&s, 1.0, &rel, SlotPolicy::First, WordFormat::Full, 0).unwrap();
        assert_eq!(batch.len(), 2);

        let empty =
            sample_matches(&s, 0.0, &rel, SlotPolicy::First, WordFormat::Full, 0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sample_matches_reproducible() {
        let rel = Relation::of_ints(&[("ab", 1), ("ba", -1)]);
        let s = symb(&[("abcd", 1), ("bacd", 2), ("ababcd", 3), ("cbcd", 4)]);

        let one = sample_matches(&s, 0.5, &rel, SlotPolicy::Any, WordFormat::Full, 9).unwrap();
        let two = sample_matches(&s, 0.5, &rel, SlotPolicy::Any, WordFormat::Full, 9).unwrap();
        assert_eq!(one, two);
    }
}
