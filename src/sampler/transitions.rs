//! Fixed first-order transition tables for constrained word generation
//!
//! Each table is the complement of an adjacency exclusion: following it can
//! never produce a forbidden pair, a forbidden first letter against a known
//! second, a forbidden last letter against a known penultimate, or a quad
//! prefix incompatible with the exposed body.

use crate::{AmpRelsError, Result};

fn bad_letter(letter: char) -> AmpRelsError {
    AmpRelsError::InvalidArgument(format!("letter '{}' is outside the base alphabet", letter))
}

/// Letters allowed to follow the given letter
pub fn successors(letter: char) -> Result<&'static [char]> {
    match letter {
        'a' => Ok(&['a', 'b', 'c', 'e', 'f']),
        'b' => Ok(&['a', 'b', 'c', 'd', 'f']),
        'c' => Ok(&['a', 'b', 'c', 'd', 'e']),
        'd' => Ok(&['b', 'c', 'd']),
        'e' => Ok(&['a', 'c', 'e']),
        'f' => Ok(&['a', 'b', 'f']),
        other => Err(bad_letter(other)),
    }
}

/// Valid first letters given the word's second letter
pub fn first_given_second(letter: char) -> Result<&'static [char]> {
    match letter {
        'a' | 'b' | 'c' => Ok(&['a', 'b', 'c']),
        'd' => Ok(&['b', 'c']),
        'e' => Ok(&['a', 'c']),
        'f' => Ok(&['a', 'b']),
        other => Err(bad_letter(other)),
    }
}

/// Valid last letters given the word's second-to-last letter
pub fn last_given_penultimate(letter: char) -> Result<&'static [char]> {
    match letter {
        'a' => Ok(&['e', 'f']),
        'b' => Ok(&['d', 'f']),
        'c' => Ok(&['d', 'e']),
        'd' => Ok(&['d']),
        'e' => Ok(&['e']),
        'f' => Ok(&['f']),
        other => Err(bad_letter(other)),
    }
}

/// Valid quad prefix letters given the last exposed body letter
///
/// The prefix encodes the hidden trailing letters of the full word, so its
/// compatibility seam is the end of the exposed body.
pub fn quad_prefix_given_last(letter: char) -> Result<&'static [char]> {
    match letter {
        'a' => Ok(&['b', 'c', 'd', 'f', 'h']),
        'b' => Ok(&['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h']),
        'c' => Ok(&['a', 'b', 'c', 'd', 'e', 'g', 'h']),
        'd' => Ok(&['a', 'b', 'c', 'd', 'e', 'g', 'h']),
        'e' => Ok(&['h']),
        'f' => Ok(&['b', 'c', 'd', 'f']),
        other => Err(bad_letter(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::forbidden_successors;
    use crate::symbol::{is_base_letter, ALPHABET};

    #[test]
    fn test_successors_complement_forbidden_pairs() {
        for letter in ALPHABET {
            let allowed = successors(letter).unwrap();
            let forbidden = forbidden_successors(letter);
            for next in ALPHABET {
                let in_allowed = allowed.contains(&next);
                let in_forbidden = forbidden.contains(next);
                assert!(in_allowed != in_forbidden, "{}{}", letter, next);
            }
        }
    }

    #[test]
    fn test_first_letters_stay_in_abc() {
        for letter in ALPHABET {
            for first in first_given_second(letter).unwrap() {
                assert!("abc".contains(*first));
                assert!(!forbidden_successors(*first).contains(letter));
            }
        }
    }

    #[test]
    fn test_last_letters_stay_in_def() {
        for letter in ALPHABET {
            for last in last_given_penultimate(letter).unwrap() {
                assert!("def".contains(*last));
                assert!(!forbidden_successors(letter).contains(*last));
            }
        }
    }

    #[test]
    fn test_non_alphabet_letters_rejected() {
        assert!(successors('z').is_err());
        assert!(first_given_second('h').is_err());
        assert!(last_given_penultimate('g').is_err());
        assert!(quad_prefix_given_last('x').is_err());
    }

    #[test]
    fn test_base_letter_coverage() {
        for letter in ALPHABET {
            assert!(is_base_letter(letter));
            assert!(!successors(letter).unwrap().is_empty());
            assert!(!quad_prefix_given_last(letter).unwrap().is_empty());
        }
    }
}
