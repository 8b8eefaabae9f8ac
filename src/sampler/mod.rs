//! Constrained random word generation, the indexed without-replacement
//! pool, and the relation-instance generation pass

mod instances;
mod pool;
mod transitions;
mod words;

pub use instances::{
    generate_instances, generate_symmetry_pairs, FamilyPlan, GenerationEntry, GenerationPlan,
    InstanceMap,
};
pub use pool::IndexedPool;
pub use transitions::{
    first_given_second, last_given_penultimate, quad_prefix_given_last, successors,
};
pub use words::{
    constrained_fragment, nontrivial_word, prefix_extension, random_word, suffix_extension,
    Seeding,
};
