//! The dihedral symmetry action on words
//!
//! The symmetry group has six elements, formed by pairing the six
//! permutations of the letter block `abc` with the six permutations of the
//! disjoint block `def` index-wise. Row 0 is the identity; rows 3 and 4 are
//! the non-trivial rotations, rows 1, 2, and 5 the reflections.
//!
//! The action is only meaningful on full-format words: a compact word hides
//! part of its letters inside the prefix convention, and an image may fall
//! outside what the prefix set can express.

use std::collections::BTreeMap;

use num_rational::Rational64;
use once_cell::sync::Lazy;

use crate::symbol::{letter_index, Symbol, Word, ALPHABET};
use crate::{AmpRelsError, Result};

/// Number of group elements
pub const GROUP_ORDER: usize = 6;

/// Rows acting as rotations (including the identity at row 0)
pub const ROTATION_ROWS: [usize; 3] = [0, 3, 4];

/// Rows acting as reflections
pub const REFLECTION_ROWS: [usize; 3] = [1, 2, 5];

// The six permutations of three indices, in lexicographic order; pairing the
// same permutation of both blocks keeps row 0 the identity.
const BLOCK_PERMS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Letter-substitution table: `TABLE[row][letter_index]` is the image letter
pub static DIHEDRAL_TABLE: Lazy<[[char; 6]; 6]> = Lazy::new(|| {
    let mut table = [[' '; 6]; 6];
    for (row, perm) in BLOCK_PERMS.iter().enumerate() {
        for i in 0..3 {
            table[row][i] = ALPHABET[perm[i]];
            table[row][3 + i] = ALPHABET[3 + perm[i]];
        }
    }
    table
});

/// How a non-identity group element acts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageClass {
    /// Row 0
    Identity,
    /// Rows 3 and 4
    Rotation,
    /// Rows 1, 2, and 5
    Reflection,
}

/// Classify a group row
pub fn classify_row(row: usize) -> Result<ImageClass> {
    match row {
        0 => Ok(ImageClass::Identity),
        3 | 4 => Ok(ImageClass::Rotation),
        1 | 2 | 5 => Ok(ImageClass::Reflection),
        other => Err(AmpRelsError::InvalidArgument(format!(
            "group row {} out of range",
            other
        ))),
    }
}

/// Image of a word under one group element
pub fn image(word: &Word, row: usize) -> Result<Word> {
    if row >= GROUP_ORDER {
        return Err(AmpRelsError::InvalidArgument(format!(
            "group row {} out of range",
            row
        )));
    }
    let table = &DIHEDRAL_TABLE[row];
    let mut out = String::with_capacity(word.len());
    for letter in word.letters() {
        let idx = letter_index(letter).ok_or_else(|| {
            AmpRelsError::InvalidArgument(format!(
                "letter '{}' is outside the base alphabet",
                letter
            ))
        })?;
        out.push(table[idx]);
    }
    Ok(Word::new(out))
}

/// All six images of a word, the original first
pub fn images(word: &Word) -> Result<Vec<Word>> {
    (0..GROUP_ORDER).map(|row| image(word, row)).collect()
}

/// The three rotation images of a word (rows 0, 3, 4)
pub fn cycle_images(word: &Word) -> Result<Vec<Word>> {
    ROTATION_ROWS.iter().map(|&row| image(word, row)).collect()
}

/// Distinct images of a word with their coefficients in a symbol
///
/// Images that coincide (the word has a non-trivial stabilizer) appear once;
/// absent images carry coefficient 0.
pub fn images_in_symbol(word: &Word, symb: &Symbol) -> Result<BTreeMap<Word, Rational64>> {
    let mut out = BTreeMap::new();
    for img in images(word)? {
        let coeff = symb.coeff_of(&img);
        out.insert(img, coeff);
    }
    Ok(out)
}

/// Image coefficients split into rotation and reflection classes
///
/// The original word appears in both classes, matching the convention that
/// the identity belongs to either reading.
#[derive(Clone, Debug)]
pub struct ImageCoeffs {
    /// Every distinct image
    pub all: BTreeMap<Word, Rational64>,
    /// Images under rows 0, 3, 4
    pub cycles: BTreeMap<Word, Rational64>,
    /// The original plus images under rows 1, 2, 5
    pub flips: BTreeMap<Word, Rational64>,
}

/// Split a word's images in a symbol into rotation and reflection classes
pub fn cycles_flips_in_symbol(word: &Word, symb: &Symbol) -> Result<ImageCoeffs> {
    let cycles_set = cycle_images(word)?;
    let mut all = BTreeMap::new();
    let mut cycles = BTreeMap::new();
    let mut flips = BTreeMap::new();

    for img in images(word)? {
        let coeff = symb.coeff_of(&img);
        if img == *word {
            cycles.insert(img.clone(), coeff);
            flips.insert(img.clone(), coeff);
        } else if cycles_set.contains(&img) {
            cycles.insert(img.clone(), coeff);
        } else {
            flips.insert(img.clone(), coeff);
        }
        all.insert(img, coeff);
    }

    Ok(ImageCoeffs { all, cycles, flips })
}

/// The images of a word that appear in `symb` and not in `exclude`
///
/// Keyed by group row, so callers can restrict to rotations or reflections.
pub fn valid_images(
    word: &Word,
    symb: &Symbol,
    exclude: Option<&Symbol>,
) -> Result<BTreeMap<usize, Word>> {
    let mut out = BTreeMap::new();
    for row in 0..GROUP_ORDER {
        let img = image(word, row)?;
        let excluded = exclude.map(|e| e.contains(&img)).unwrap_or(false);
        if symb.contains(&img) && !excluded {
            out.insert(row, img);
        }
    }
    Ok(out)
}

/// Fraction of a word's distinct images whose symbol coefficient disagrees
/// with the given ground-truth value
pub fn wrong_image_fraction(word: &Word, truth: Rational64, symb: &Symbol) -> Result<f64> {
    let image_coeffs = images_in_symbol(word, symb)?;
    let wrong = image_coeffs.values().filter(|c| **c != truth).count();
    Ok(wrong as f64 / image_coeffs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_zero_is_identity() {
        for w in ["a", "abcdef", "ddff", "cab"] {
            let word = Word::new(w);
            assert_eq!(images(&word).unwrap()[0], word);
        }
    }

    #[test]
    fn test_blocks_stay_disjoint() {
        // abc letters map to abc letters, def letters to def letters
        for row in 0..GROUP_ORDER {
            for (i, _) in ALPHABET.iter().enumerate() {
                let img = DIHEDRAL_TABLE[row][i];
                let img_idx = letter_index(img).unwrap();
                assert_eq!(i < 3, img_idx < 3);
            }
        }
    }

    #[test]
    fn test_known_images() {
        let word = Word::new("ad");
        let imgs = images(&word).unwrap();
        let strs: Vec<&str> = imgs.iter().map(|w| w.as_str()).collect();
        assert_eq!(strs, vec!["ad", "ad", "be", "be", "cf", "cf"]);
    }

    #[test]
    fn test_out_of_range_row() {
        assert!(image(&Word::new("a"), 6).is_err());
        assert!(classify_row(6).is_err());
    }

    #[test]
    fn test_non_alphabet_letter() {
        assert!(image(&Word::new("axe"), 1).is_err());
    }

    #[test]
    fn test_classification_covers_group() {
        assert_eq!(classify_row(0).unwrap(), ImageClass::Identity);
        for row in ROTATION_ROWS.iter().skip(1) {
            assert_eq!(classify_row(*row).unwrap(), ImageClass::Rotation);
        }
        for row in REFLECTION_ROWS {
            assert_eq!(classify_row(row).unwrap(), ImageClass::Reflection);
        }
    }

    #[test]
    fn test_images_in_symbol_dedups_fixed_words() {
        // "ad" has stabilizer of order 2: only three distinct images
        let symb: Symbol = [(Word::new("be"), Rational64::from(4))]
            .into_iter()
            .collect();
        let coeffs = images_in_symbol(&Word::new("ad"), &symb).unwrap();
        assert_eq!(coeffs.len(), 3);
        assert_eq!(coeffs[&Word::new("be")], Rational64::from(4));
        assert_eq!(coeffs[&Word::new("cf")], Rational64::from(0));
    }

    #[test]
    fn test_wrong_image_fraction() {
        let symb: Symbol = [
            (Word::new("ad"), Rational64::from(4)),
            (Word::new("be"), Rational64::from(4)),
            (Word::new("cf"), Rational64::from(5)),
        ]
        .into_iter()
        .collect();
        let frac = wrong_image_fraction(&Word::new("ad"), Rational64::from(4), &symb).unwrap();
        assert!((frac - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cycles_flips_split() {
        let symb = Symbol::new();
        let split = cycles_flips_in_symbol(&Word::new("abd"), &symb).unwrap();
        // word with trivial stabilizer: 6 distinct images, 3 + (1 + 3)
        assert_eq!(split.all.len(), 6);
        assert_eq!(split.cycles.len(), 3);
        assert_eq!(split.flips.len(), 4);
        assert!(split.cycles.contains_key(&Word::new("abd")));
        assert!(split.flips.contains_key(&Word::new("abd")));
    }
}
