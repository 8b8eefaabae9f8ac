//! JSON persistence of relation-instance batches
//!
//! One file per relation-table entry, named `{family}_{index}.json` and
//! holding an array of word → relation-coefficient objects. A generation
//! pass writes them; the relation-oriented verifier reads them back.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::algebra::RelationFamily;
use crate::sampler::InstanceMap;
use crate::Result;

/// File name for one relation-table entry's instances
pub fn instance_filename(family: RelationFamily, index: usize) -> String {
    format!("{}_{}.json", family, index)
}

/// Parse a file name written by [`instance_filename`]
pub fn parse_instance_filename(name: &str) -> Option<(RelationFamily, usize)> {
    let stem = name.strip_suffix(".json")?;
    let (family, index) = stem.rsplit_once('_')?;
    Some((family.parse().ok()?, index.parse().ok()?))
}

/// Write one entry's instance batch, returning the file path
pub fn write_instances(
    dir: &Path,
    family: RelationFamily,
    index: usize,
    instances: &[InstanceMap],
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(instance_filename(family, index));
    let json = serde_json::to_string_pretty(instances)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), instances = instances.len(), "instance batch written");
    Ok(path)
}

/// Read one instance batch back
pub fn read_instances(path: &Path) -> Result<Vec<InstanceMap>> {
    let contents = fs::read_to_string(path)?;
    let instances = serde_json::from_str(&contents)?;
    Ok(instances)
}

/// Read every instance batch in a directory
///
/// Non-JSON files and files with unrecognized names are skipped. Batches
/// come back sorted by entry id (`{family}{index}`), matching the score-map
/// keys of the verifier.
pub fn read_instance_dir(dir: &Path) -> Result<Vec<(String, Vec<InstanceMap>)>> {
    let mut batches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        let (family, index) = match parse_instance_filename(name) {
            Some(parsed) => parsed,
            None => {
                debug!(file = name, "skipping unrecognized file");
                continue;
            }
        };
        let instances = read_instances(&path)?;
        batches.push((family.entry_id(index), instances));
    }
    batches.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(batches)
}
