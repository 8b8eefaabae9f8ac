//! Thin IO collaborators: algebra-export notation parsing and JSON
//! persistence of relation instances
//!
//! The core never performs IO of its own; everything here reduces to
//! producing or consuming the mapping types the core already understands.

mod notation;
mod persist;

pub use notation::{parse_terms, read_block, read_symbol};
pub use persist::{
    instance_filename, parse_instance_filename, read_instance_dir, read_instances,
    write_instances,
};
