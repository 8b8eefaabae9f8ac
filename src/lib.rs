//! # amplitude-rels: linear relations on amplitude symbols
//!
//! This library checks and generates the homogeneous linear relations that
//! must hold among the coefficients of a "symbol": a mapping from words over
//! a fixed six-letter alphabet to exact rational coefficients, as used to
//! represent scattering-amplitude-like quantities.
//!
//! ## Features
//!
//! - **Symmetry orbits**: dihedral images of words and relations, with
//!   deduplication
//! - **Relation tables**: the physically-derived identity families
//!   (first-entry, adjacency, integrability, initial/final multi-entry)
//! - **Pattern matching**: slot-aware instantiation of relations inside
//!   arbitrary words, full and compact-quad formats
//! - **Verification**: exact relation sums and multi-notion correctness
//!   scoring against a ground-truth symbol
//! - **Constrained sampling**: adjacency-respecting word generation and an
//!   O(1) without-replacement pool

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Alphabet, words, formats, and the symbol map
pub mod symbol;

/// Dihedral symmetry, relations, static tables, and word classifiers
pub mod algebra;

/// Slot-aware pattern matching of relations inside words
pub mod matcher;

/// Relation sums, correctness scoring, and batch assessment
pub mod verify;

/// Constrained random words, the indexed pool, and instance generation
pub mod sampler;

/// Algebra-export notation parsing and relation-instance persistence
pub mod io;

// Re-export commonly used types
pub use algebra::{Relation, RelationFamily};
pub use matcher::{RelationInstance, SlotPolicy};
pub use symbol::{Symbol, Word, WordFormat};
pub use verify::{RelationScore, RelationSum};

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum AmpRelsError {
    /// Unrecognized slot policy, word format, or symmetry row
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not defined for the given inputs (e.g. final-slot matching
    /// on a compact format)
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A without-replacement pool was asked for more draws than remain
    #[error("pool exhausted: requested {requested}, remaining {remaining}")]
    Exhausted {
        /// Number of draws asked for
        requested: usize,
        /// Number of draws still available
        remaining: usize,
    },

    /// Malformed algebra-export notation
    #[error("parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, AmpRelsError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        algebra::{self, Relation, RelationFamily, Sector},
        matcher::{match_in_word, sample_matches, RelationInstance, SlotPolicy},
        sampler::{IndexedPool, Seeding},
        symbol::{Symbol, Word, WordFormat},
        verify::{CheckPlan, RelationScore, RelationSum},
        AmpRelsError, Result,
    };
}
