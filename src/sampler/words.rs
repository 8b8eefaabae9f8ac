//! Constrained and unconstrained random word generation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::transitions::{
    first_given_second, last_given_penultimate, quad_prefix_given_last, successors,
};
use crate::symbol::{Word, WordFormat, ALPHABET, QUAD_PREFIX};
use crate::{AmpRelsError, Result};

/// How the unconstrained word generator derives its randomness
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seeding {
    /// Re-seed once per letter with `seed + position`
    ///
    /// Each letter's draw is reproducible from its position alone. This is
    /// not a faithful single draw of the word's joint distribution. It is
    /// kept as the default for compatibility with existing fixtures.
    #[default]
    PerPosition,
    /// Seed a single generator once per word: the corrected joint draw,
    /// selected explicitly
    PerWord,
}

fn pick(rng: &mut StdRng, choices: &[char]) -> char {
    *choices.choose(rng).expect("transition tables are non-empty")
}

/// Generate a random word of the given body length
///
/// Letters are uniform over the base alphabet with no adjacency constraint.
/// Quad format prepends one prefix letter from the eight-letter set, drawn
/// with its own derived seed under [`Seeding::PerPosition`].
pub fn random_word(length: usize, format: WordFormat, seed: u64, seeding: Seeding) -> Word {
    let mut body = String::with_capacity(length + 1);
    match seeding {
        Seeding::PerPosition => {
            for position in 0..length {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(position as u64));
                body.push(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
            }
            match format {
                WordFormat::Full => Word::new(body),
                WordFormat::Quad => {
                    let mut rng =
                        StdRng::seed_from_u64(seed.wrapping_add(100).wrapping_mul(10));
                    let prefix = QUAD_PREFIX[rng.gen_range(0..QUAD_PREFIX.len())];
                    Word::new(format!("{}{}", prefix, body))
                }
            }
        }
        Seeding::PerWord => {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..length {
                body.push(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
            }
            match format {
                WordFormat::Full => Word::new(body),
                WordFormat::Quad => {
                    let prefix = QUAD_PREFIX[rng.gen_range(0..QUAD_PREFIX.len())];
                    Word::new(format!("{}{}", prefix, body))
                }
            }
        }
    }
}

/// Generate a fragment respecting the adjacency exclusions
///
/// The first letter comes from `abc`, each following letter from the
/// successor table; the result is free of forbidden pairs but carries no
/// last-letter guarantee.
pub fn constrained_fragment(length: usize, rng: &mut StdRng) -> Result<Word> {
    let mut out = String::with_capacity(length);
    let mut letter = ' ';
    for i in 0..length {
        letter = if i == 0 {
            pick(rng, &['a', 'b', 'c'])
        } else {
            pick(rng, successors(letter)?)
        };
        out.push(letter);
    }
    Ok(Word::new(out))
}

/// Generate letters to prepend before a fragment starting with `boundary`
///
/// Walks the successor table outward from the boundary (the adjacency
/// exclusions are symmetric), drawing the outermost letter from the valid
/// first-letter table, then reverses. Appending the result before the
/// fragment yields no forbidden pair and a legal leading letter.
pub fn prefix_extension(length: usize, boundary: char, rng: &mut StdRng) -> Result<Word> {
    let mut letters = Vec::with_capacity(length);
    let mut letter = boundary;
    for i in 0..length {
        letter = if i == length - 1 {
            pick(rng, first_given_second(letter)?)
        } else {
            pick(rng, successors(letter)?)
        };
        letters.push(letter);
    }
    letters.reverse();
    Ok(Word::new(letters.into_iter().collect::<String>()))
}

/// Generate letters to append after a fragment ending with `boundary`
///
/// With `close_word` the final letter comes from the valid last-letter
/// table, so the extension can legally end a word.
pub fn suffix_extension(
    length: usize,
    boundary: char,
    close_word: bool,
    rng: &mut StdRng,
) -> Result<Word> {
    let mut out = String::with_capacity(length);
    let mut letter = boundary;
    for i in 0..length {
        letter = if close_word && i == length - 1 {
            pick(rng, last_given_penultimate(letter)?)
        } else {
            pick(rng, successors(letter)?)
        };
        out.push(letter);
    }
    Ok(Word::new(out))
}

/// Generate a word that is not a trivial zero
///
/// Full format: a constrained fragment of `2·loops − 1` letters closed by a
/// valid last letter. Quad format: a constrained body of `2·loops − 4`
/// letters with a compatible prefix letter prepended.
pub fn nontrivial_word(loops: usize, format: WordFormat, rng: &mut StdRng) -> Result<Word> {
    match format {
        WordFormat::Full => {
            if loops < 1 {
                return Err(AmpRelsError::InvalidArgument(
                    "full-format words need loop order >= 1".into(),
                ));
            }
            let stem = constrained_fragment(2 * loops - 1, rng)?;
            let last = pick(
                rng,
                last_given_penultimate(stem.last().expect("stem is non-empty"))?,
            );
            Ok(Word::new(format!("{}{}", stem, last)))
        }
        WordFormat::Quad => {
            if loops < 3 {
                return Err(AmpRelsError::InvalidArgument(
                    "quad-format words need loop order >= 3".into(),
                ));
            }
            let body = constrained_fragment(2 * loops - 4, rng)?;
            let prefix = pick(
                rng,
                quad_prefix_given_last(body.last().expect("body is non-empty"))?,
            );
            Ok(Word::new(format!("{}{}", prefix, body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{is_trivial_zero, is_trivial_zero_walk};

    #[test]
    fn test_random_word_reproducible() {
        let one = random_word(5, WordFormat::Full, 7, Seeding::PerPosition);
        let two = random_word(5, WordFormat::Full, 7, Seeding::PerPosition);
        assert_eq!(one, two);
        assert_eq!(one.len(), 5);

        let other = random_word(12, WordFormat::Full, 1000, Seeding::PerPosition);
        assert_ne!(one, other);
        assert_ne!(
            random_word(12, WordFormat::Full, 7, Seeding::PerPosition),
            other
        );
    }

    #[test]
    fn test_per_position_seeding_shifts() {
        // with per-position reseeding, seed k position i equals seed k+1
        // position i-1: the word shifts by one letter
        let a = random_word(6, WordFormat::Full, 10, Seeding::PerPosition);
        let b = random_word(6, WordFormat::Full, 11, Seeding::PerPosition);
        assert_eq!(&a.as_str()[1..], &b.as_str()[..5]);
    }

    #[test]
    fn test_per_word_seeding_does_not_shift() {
        let a = random_word(6, WordFormat::Full, 10, Seeding::PerWord);
        let b = random_word(6, WordFormat::Full, 11, Seeding::PerWord);
        assert_eq!(a, random_word(6, WordFormat::Full, 10, Seeding::PerWord));
        assert_ne!(&a.as_str()[1..], &b.as_str()[..5]);
    }

    #[test]
    fn test_quad_random_word_shape() {
        let w = random_word(4, WordFormat::Quad, 3, Seeding::PerPosition);
        assert_eq!(w.len(), 5);
        assert!(w.is_valid(WordFormat::Quad));
    }

    #[test]
    fn test_constrained_fragment_avoids_forbidden_pairs() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let frag = constrained_fragment(9, &mut rng).unwrap();
            assert!(!crate::algebra::has_forbidden_pair_walk(&frag), "{}", frag);
            assert!("abc".contains(frag.first().unwrap()));
        }
    }

    #[test]
    fn test_nontrivial_words_are_nontrivial() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let w = nontrivial_word(4, WordFormat::Full, &mut rng).unwrap();
            assert_eq!(w.len(), 8);
            assert!(!is_trivial_zero(&w), "{}", w);
            assert!(!is_trivial_zero_walk(&w), "{}", w);
        }
    }

    #[test]
    fn test_quad_nontrivial_word_shape() {
        let mut rng = StdRng::seed_from_u64(5);
        let w = nontrivial_word(4, WordFormat::Quad, &mut rng).unwrap();
        assert_eq!(w.len(), 5);
        assert!(w.is_valid(WordFormat::Quad));
        assert!(nontrivial_word(2, WordFormat::Quad, &mut rng).is_err());
    }

    #[test]
    fn test_prefix_extension_is_legal() {
        let mut rng = StdRng::seed_from_u64(11);
        for boundary in ['a', 'd', 'f'] {
            for _ in 0..20 {
                let pre = prefix_extension(4, boundary, &mut rng).unwrap();
                let joined = Word::new(format!("{}{}", pre, boundary));
                assert!(!crate::algebra::has_forbidden_pair_walk(&joined));
                assert!("abc".contains(joined.first().unwrap()));
            }
        }
    }

    #[test]
    fn test_suffix_extension_closes_word() {
        let mut rng = StdRng::seed_from_u64(13);
        for boundary in ['a', 'b', 'c'] {
            for _ in 0..20 {
                let post = suffix_extension(4, boundary, true, &mut rng).unwrap();
                let joined = Word::new(format!("{}{}", boundary, post));
                assert!(!crate::algebra::has_forbidden_pair_walk(&joined));
                assert!("def".contains(joined.last().unwrap()));
            }
        }
    }
}
