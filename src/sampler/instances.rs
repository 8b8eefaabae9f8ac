//! Generation of synthetic relation instances
//!
//! Builds host words containing a relation's pattern at a legal position,
//! then lets the matcher expand the substitutions, producing the persistable
//! word → relation-coefficient maps consumed by the relation-oriented
//! verifier.

use std::collections::{BTreeMap, BTreeSet};

use num_rational::Rational64;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::pool::IndexedPool;
use super::words::{prefix_extension, suffix_extension};
use crate::algebra::{table_orbit, valid_images, ImageClass, Relation, RelationFamily};
use crate::matcher::{match_in_word, SlotPolicy};
use crate::symbol::{Symbol, Word, WordFormat};
use crate::{AmpRelsError, Result};

/// Per-family generation quotas
///
/// `counts[i]` is how many instances to generate for the i-th relation of
/// the family's dihedral orbit; `overlaps[i]` is the minimum number of
/// instance words that must already be present in the reference symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyPlan {
    /// Instances to generate per orbit entry
    pub counts: Vec<usize>,
    /// Minimum symbol overlap per orbit entry
    pub overlaps: Vec<usize>,
}

/// What to generate for each relation family
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPlan {
    /// Quotas keyed by family
    pub families: BTreeMap<RelationFamily, FamilyPlan>,
    /// Whether to keep entries whose overlap quota is zero
    pub include_zero_overlap: bool,
    /// Seed for the word construction
    pub seed: u64,
}

/// One expanded generation work item
#[derive(Clone, Debug)]
pub struct GenerationEntry {
    /// Identifier, `{family}_{orbit index}`
    pub id: String,
    /// The orbit relation to instantiate
    pub relation: Relation,
    /// Where the pattern may sit
    pub slot: SlotPolicy,
    /// Instances to produce
    pub count: usize,
    /// Minimum words shared with the reference symbol
    pub min_overlap: usize,
}

impl GenerationPlan {
    /// The default quotas for full-format data
    pub fn full_default() -> Self {
        let mut families = BTreeMap::new();
        families.insert(
            RelationFamily::First,
            FamilyPlan {
                counts: vec![500; 3],
                overlaps: vec![0; 3],
            },
        );
        families.insert(
            RelationFamily::Double,
            FamilyPlan {
                counts: vec![500; 3],
                overlaps: vec![0; 3],
            },
        );
        families.insert(
            RelationFamily::Triple,
            FamilyPlan {
                counts: vec![500],
                overlaps: vec![1],
            },
        );
        families.insert(
            RelationFamily::Final,
            FamilyPlan {
                counts: vec![500; 29],
                overlaps: [vec![0; 19], vec![1; 10]].concat(),
            },
        );
        families.insert(
            RelationFamily::Integral,
            FamilyPlan {
                counts: vec![500; 3],
                overlaps: vec![1; 3],
            },
        );
        GenerationPlan {
            families,
            include_zero_overlap: false,
            seed: 0,
        }
    }

    /// The default quotas for compact-format data: no final-entry relations
    /// across the seam
    pub fn compact_default() -> Self {
        let mut plan = Self::full_default();
        plan.families.remove(&RelationFamily::Final);
        plan
    }

    /// Expand the quotas into per-orbit-entry work items
    ///
    /// Each family's table is closed under the dihedral action first; the
    /// quota lists index into that orbit. Entries with a zero overlap quota
    /// are dropped unless `include_zero_overlap` is set.
    pub fn entries(&self) -> Result<Vec<GenerationEntry>> {
        let mut out = Vec::new();
        for (family, plan) in &self.families {
            if plan.counts.len() != plan.overlaps.len() {
                return Err(AmpRelsError::InvalidArgument(format!(
                    "family '{}': {} counts vs {} overlaps",
                    family,
                    plan.counts.len(),
                    plan.overlaps.len()
                )));
            }
            let orbit = table_orbit(family.table())?;
            if plan.counts.len() > orbit.len() {
                return Err(AmpRelsError::InvalidArgument(format!(
                    "family '{}': {} quotas but orbit has {} relations",
                    family,
                    plan.counts.len(),
                    orbit.len()
                )));
            }
            for (i, (&count, &overlap)) in
                plan.counts.iter().zip(plan.overlaps.iter()).enumerate()
            {
                if overlap == 0 && !self.include_zero_overlap {
                    continue;
                }
                out.push(GenerationEntry {
                    id: format!("{}_{}", family, i),
                    relation: orbit[i].clone(),
                    slot: family.slot(),
                    count,
                    min_overlap: overlap,
                });
            }
        }
        Ok(out)
    }
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self::full_default()
    }
}

/// A persistable relation instance: word → relation coefficient
pub type InstanceMap = BTreeMap<Word, Rational64>;

fn host_word(
    entry: &GenerationEntry,
    loops: usize,
    format: WordFormat,
    rng: &mut StdRng,
) -> Result<Word> {
    let rel = &entry.relation;
    let n = rel.fragment_len();
    let fragments: Vec<&Word> = rel.iter().map(|(w, _)| w).collect();
    let frag = fragments[rng.gen_range(0..fragments.len())];
    let body_len = match format {
        WordFormat::Full => 2 * loops,
        WordFormat::Quad => 2 * loops - 4,
    };
    if n > body_len {
        return Err(AmpRelsError::InvalidArgument(format!(
            "fragment length {} exceeds body length {}",
            n, body_len
        )));
    }

    let first = frag.first().expect("relation fragments are non-empty");
    let last = frag.last().expect("relation fragments are non-empty");
    let body = match entry.slot {
        SlotPolicy::First | SlotPolicy::Initial => {
            let post = suffix_extension(body_len - n, last, format == WordFormat::Full, rng)?;
            format!("{}{}", frag, post)
        }
        SlotPolicy::Final => {
            if format == WordFormat::Quad {
                return Err(AmpRelsError::Unsupported(
                    "final-slot generation is not defined for compact formats".into(),
                ));
            }
            let pre = prefix_extension(body_len - n, first, rng)?;
            format!("{}{}", pre, frag)
        }
        SlotPolicy::Any => {
            let position = rng.gen_range(0..=(body_len - n));
            let pre = prefix_extension(position, first, rng)?;
            let close = format == WordFormat::Full;
            let post = suffix_extension(body_len - position - n, last, close, rng)?;
            format!("{}{}{}", pre, frag, post)
        }
    };

    match format {
        WordFormat::Full => Ok(Word::new(body)),
        WordFormat::Quad => {
            let seam = body.chars().last().expect("body is non-empty");
            let choices = super::transitions::quad_prefix_given_last(seam)?;
            let prefix = choices.choose(rng).expect("prefix tables are non-empty");
            Ok(Word::new(format!("{}{}", prefix, body)))
        }
    }
}

/// Generate deduplicated relation instances for one work item
///
/// Host words are built around a randomly chosen fragment at a slot-legal
/// position; the matcher then expands every substitution. With a reference
/// symbol, candidates are kept only when at least `min_overlap` of their
/// words carry symbol terms. Falling short of the quota after a bounded
/// number of attempts returns the instances found so far.
pub fn generate_instances(
    entry: &GenerationEntry,
    loops: usize,
    format: WordFormat,
    symb: Option<&Symbol>,
    seed: u64,
) -> Result<Vec<InstanceMap>> {
    if entry.min_overlap > 0 && symb.is_none() {
        return Err(AmpRelsError::InvalidArgument(format!(
            "entry '{}' requires symbol overlap but no symbol was given",
            entry.id
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let empty = Symbol::new();
    let lookup = symb.unwrap_or(&empty);

    let mut out: Vec<InstanceMap> = Vec::with_capacity(entry.count);
    let mut seen: BTreeSet<InstanceMap> = BTreeSet::new();
    let max_attempts = entry.count.saturating_mul(50).max(50);

    for _ in 0..max_attempts {
        if out.len() >= entry.count {
            break;
        }
        let host = host_word(entry, loops, format, &mut rng)?;
        for inst in match_in_word(&host, &entry.relation, entry.slot, format, lookup)? {
            if out.len() >= entry.count {
                break;
            }
            if entry.min_overlap > 0 {
                let overlap = inst
                    .terms()
                    .iter()
                    .filter(|t| lookup.contains(&t.word))
                    .count();
                if overlap < entry.min_overlap {
                    continue;
                }
            }
            let map = inst.coeff_map();
            if seen.insert(map.clone()) {
                out.push(map);
            }
        }
    }

    if out.len() < entry.count {
        warn!(
            entry = %entry.id,
            produced = out.len(),
            wanted = entry.count,
            "instance generation fell short of its quota"
        );
    } else {
        debug!(entry = %entry.id, produced = out.len(), "instances generated");
    }
    Ok(out)
}

/// Generate two-term symmetry-pair instances from a symbol's words
///
/// Each pair asserts that a word and one of its rotation (or reflection)
/// images carry equal coefficients: `{word: 1, image: -1}`. Words are drawn
/// without replacement from the symbol; generation stops early when the
/// pool runs dry.
pub fn generate_symmetry_pairs(
    symb: &Symbol,
    class: ImageClass,
    count: usize,
    seed: u64,
    exclude: Option<&Symbol>,
) -> Result<Vec<InstanceMap>> {
    let rows: &[usize] = match class {
        ImageClass::Rotation => &[3, 4],
        ImageClass::Reflection => &[1, 2, 5],
        ImageClass::Identity => {
            return Err(AmpRelsError::InvalidArgument(
                "symmetry pairs need a non-identity image class".into(),
            ))
        }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pool = IndexedPool::from_keys(symb.words().cloned());
    let mut out = Vec::new();
    let mut seen: BTreeSet<InstanceMap> = BTreeSet::new();

    while out.len() < count {
        let word = match pool.pop_random(&mut rng) {
            Ok(w) => w,
            Err(AmpRelsError::Exhausted { .. }) => break,
            Err(e) => return Err(e),
        };
        let images = valid_images(&word, symb, exclude)?;
        let candidates: Vec<&Word> = rows.iter().filter_map(|row| images.get(row)).collect();
        let image = match candidates.choose(&mut rng) {
            Some(img) => (*img).clone(),
            None => continue,
        };
        if image == word {
            continue;
        }
        let mut map = InstanceMap::new();
        map.insert(word, Rational64::from(1));
        map.insert(image, Rational64::from(-1));
        if seen.insert(map.clone()) {
            out.push(map);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::RelationInstance;
    use crate::verify::relation_sum;

    #[test]
    fn test_plan_expansion_skips_zero_overlap() {
        let plan = GenerationPlan::full_default();
        let entries = plan.entries().unwrap();
        // first and double quotas are all zero-overlap: dropped
        assert!(entries.iter().all(|e| e.min_overlap > 0));
        assert!(entries.iter().any(|e| e.id.starts_with("triple_")));
        assert!(entries.iter().any(|e| e.id.starts_with("integral_")));

        let mut plan = GenerationPlan::full_default();
        plan.include_zero_overlap = true;
        let all = plan.entries().unwrap();
        assert!(all.iter().any(|e| e.id.starts_with("first_")));
        assert!(all.len() > entries.len());
    }

    #[test]
    fn test_plan_mismatched_lengths_rejected() {
        let mut plan = GenerationPlan::full_default();
        plan.families.insert(
            RelationFamily::Triple,
            FamilyPlan {
                counts: vec![5, 5],
                overlaps: vec![1],
            },
        );
        assert!(plan.entries().is_err());
    }

    #[test]
    fn test_generated_instances_contain_the_pattern() {
        let entry = GenerationEntry {
            id: "triple_0".into(),
            relation: Relation::of_ints(&[("aab", 1), ("abb", 1), ("acb", 1)]),
            slot: SlotPolicy::Any,
            count: 10,
            min_overlap: 0,
        };
        let maps = generate_instances(&entry, 4, WordFormat::Full, None, 17).unwrap();
        assert_eq!(maps.len(), 10);
        for map in &maps {
            assert_eq!(map.len(), 3);
            for word in map.keys() {
                assert_eq!(word.len(), 8);
            }
        }
        // deterministic under the same seed
        let again = generate_instances(&entry, 4, WordFormat::Full, None, 17).unwrap();
        assert_eq!(maps, again);
    }

    #[test]
    fn test_generated_first_slot_instances() {
        let entry = GenerationEntry {
            id: "first_0".into(),
            relation: Relation::of_ints(&[("d", 1)]),
            slot: SlotPolicy::First,
            count: 5,
            min_overlap: 0,
        };
        let maps = generate_instances(&entry, 3, WordFormat::Full, None, 2).unwrap();
        assert_eq!(maps.len(), 5);
        for map in &maps {
            assert_eq!(map.len(), 1);
            assert!(map.keys().all(|w| w.first() == Some('d')));
        }
    }

    #[test]
    fn test_overlap_requires_symbol() {
        let entry = GenerationEntry {
            id: "integral_0".into(),
            relation: Relation::of_ints(&[("ab", 1), ("ba", -1)]),
            slot: SlotPolicy::Any,
            count: 5,
            min_overlap: 1,
        };
        assert!(generate_instances(&entry, 3, WordFormat::Full, None, 0).is_err());
    }

    #[test]
    fn test_quad_generation_shape() {
        let entry = GenerationEntry {
            id: "double_0".into(),
            relation: Relation::of_ints(&[("de", 1)]),
            slot: SlotPolicy::Any,
            count: 5,
            min_overlap: 0,
        };
        let maps = generate_instances(&entry, 4, WordFormat::Quad, None, 3).unwrap();
        assert_eq!(maps.len(), 5);
        for map in &maps {
            for word in map.keys() {
                // prefix letter + 4-letter exposed body
                assert_eq!(word.len(), 5);
                assert!(word.is_valid(WordFormat::Quad));
            }
        }
    }

    #[test]
    fn test_symmetry_pairs_balance_on_symmetric_symbol() {
        // a symbol constant on each orbit: every pair must sum to zero
        let mut symb = Symbol::new();
        for word in ["abcd", "bcad", "cabd"] {
            for img in crate::algebra::images(&Word::new(word)).unwrap() {
                symb.insert(img, Rational64::from(9));
            }
        }
        let pairs =
            generate_symmetry_pairs(&symb, ImageClass::Rotation, 4, 0, None).unwrap();
        assert!(!pairs.is_empty());
        for map in &pairs {
            assert_eq!(map.len(), 2);
            let inst = RelationInstance::from_coeff_map(map, &symb);
            assert!(relation_sum(&inst).is_zero());
        }
    }

    #[test]
    fn test_symmetry_pairs_reject_identity_class() {
        let symb = Symbol::new();
        assert!(generate_symmetry_pairs(&symb, ImageClass::Identity, 1, 0, None).is_err());
    }
}
