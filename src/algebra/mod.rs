//! Dihedral symmetry, relations and their orbits, static relation tables,
//! and word classifiers

mod classifier;
mod dihedral;
mod relation;
mod tables;

pub use classifier::{
    forbidden_successors, has_forbidden_pair_scan, has_forbidden_pair_walk, is_admissible,
    is_trivial_zero, is_trivial_zero_walk, Sector, SectorRules,
};
pub use dihedral::{
    classify_row, cycle_images, cycles_flips_in_symbol, image, images, images_in_symbol,
    valid_images, wrong_image_fraction, ImageClass, ImageCoeffs, DIHEDRAL_TABLE, GROUP_ORDER,
    REFLECTION_ROWS, ROTATION_ROWS,
};
pub use relation::{relation_orbit, table_orbit, Relation};
pub use tables::{
    RelationFamily, DOUBLE_ADJACENCY, DOUBLE_ADJACENCY_ORBIT, FINAL_ENTRIES, FIRST_ENTRY,
    INITIAL_ENTRIES, INTEGRABILITY, TRIPLE_ADJACENCY,
};
