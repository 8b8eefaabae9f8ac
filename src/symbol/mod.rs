//! Alphabet, word formats, words, and the symbol map

mod map;
mod word;

pub use map::Symbol;
pub use word::{
    is_base_letter, is_quad_prefix, letter_index, Word, WordFormat, ALPHABET, QUAD_PREFIX,
};

pub(crate) use word::find_all;
