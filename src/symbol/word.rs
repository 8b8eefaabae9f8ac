//! Letters, word formats, and the word type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AmpRelsError, Result};

/// The fixed six-letter base alphabet
pub const ALPHABET: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];

/// The eight-letter prefix alphabet of the compact quad format
pub const QUAD_PREFIX: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Index of a base letter within [`ALPHABET`], if it is one
pub fn letter_index(letter: char) -> Option<usize> {
    ALPHABET.iter().position(|&l| l == letter)
}

/// Whether a character belongs to the base alphabet
pub fn is_base_letter(letter: char) -> bool {
    letter_index(letter).is_some()
}

/// Whether a character belongs to the quad prefix alphabet
pub fn is_quad_prefix(letter: char) -> bool {
    QUAD_PREFIX.contains(&letter)
}

/// Representation format of a word
///
/// In the `Quad` format a single leading prefix letter from the eight-letter
/// set stands in for the trailing four letters of the corresponding full
/// word; only the remaining body letters are spelled out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordFormat {
    /// Every letter spelled out
    Full,
    /// One prefix letter followed by the exposed body
    Quad,
}

impl WordFormat {
    /// Word length at a given loop order
    pub fn word_len(&self, loops: usize) -> usize {
        match self {
            WordFormat::Full => 2 * loops,
            // one prefix letter plus the exposed body
            WordFormat::Quad => 2 * loops - 3,
        }
    }
}

impl fmt::Display for WordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordFormat::Full => write!(f, "full"),
            WordFormat::Quad => write!(f, "quad"),
        }
    }
}

impl FromStr for WordFormat {
    type Err = AmpRelsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(WordFormat::Full),
            "quad" => Ok(WordFormat::Quad),
            other => Err(AmpRelsError::InvalidArgument(format!(
                "unknown word format '{}'",
                other
            ))),
        }
    }
}

/// An ordered sequence of letters; a basis term of a symbol
///
/// Words are plain ASCII strings over the alphabet. Construction via
/// [`Word::new`] does not validate letters; screening against a format is a
/// separate, explicit step ([`Word::is_valid`]), since symbols coming from a
/// model may legitimately contain malformed keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Create a word without validating its letters
    pub fn new(letters: impl Into<String>) -> Self {
        Word(letters.into())
    }

    /// Create a word, checking every letter against the format
    pub fn parse(letters: &str, format: WordFormat) -> Result<Self> {
        let word = Word::new(letters);
        if word.is_valid(format) {
            Ok(word)
        } else {
            Err(AmpRelsError::InvalidArgument(format!(
                "'{}' is not a valid {} word",
                letters, format
            )))
        }
    }

    /// The underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the word has no letters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the letters
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    /// First letter, if any
    pub fn first(&self) -> Option<char> {
        self.0.chars().next()
    }

    /// Last letter, if any
    pub fn last(&self) -> Option<char> {
        self.0.chars().last()
    }

    /// Whether every letter is legitimate for the given format
    ///
    /// A full word uses base letters only; a quad word is one prefix letter
    /// followed by base letters. The empty word is not valid in any format.
    pub fn is_valid(&self, format: WordFormat) -> bool {
        match format {
            WordFormat::Full => {
                !self.is_empty() && self.letters().all(is_base_letter)
            }
            WordFormat::Quad => {
                let mut letters = self.letters();
                match letters.next() {
                    Some(prefix) => is_quad_prefix(prefix) && letters.all(is_base_letter),
                    None => false,
                }
            }
        }
    }

    /// The compact-format prefix letter (first letter of a quad word)
    pub fn quad_prefix(&self) -> Option<char> {
        self.first()
    }

    /// The exposed letters: the whole word for full format, everything after
    /// the prefix letter for quad
    pub fn body(&self, format: WordFormat) -> &str {
        match format {
            WordFormat::Full => &self.0,
            WordFormat::Quad => match self.first() {
                Some(prefix) => &self.0[prefix.len_utf8()..],
                None => "",
            },
        }
    }

    /// Start offsets of every non-overlapping occurrence of `fragment`
    ///
    /// Explicit linear scan over the finite alphabet; after a hit the scan
    /// resumes past the matched fragment.
    pub fn find_all(&self, fragment: &str) -> Vec<usize> {
        find_all(&self.0, fragment)
    }
}

/// Non-overlapping occurrence scan used by the matcher
pub(crate) fn find_all(haystack: &str, fragment: &str) -> Vec<usize> {
    let mut hits = Vec::new();
    if fragment.is_empty() || fragment.len() > haystack.len() {
        return hits;
    }
    let hay = haystack.as_bytes();
    let frag = fragment.as_bytes();
    let mut start = 0;
    while start + frag.len() <= hay.len() {
        if &hay[start..start + frag.len()] == frag {
            hits.push(start);
            start += frag.len();
        } else {
            start += 1;
        }
    }
    hits
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.0)
    }
}

impl From<&str> for Word {
    fn from(s: &str) -> Self {
        Word::new(s)
    }
}

impl From<String> for Word {
    fn from(s: String) -> Self {
        Word::new(s)
    }
}
