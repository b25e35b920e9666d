use log::{debug, warn};
use rayon::prelude::*;

use crate::digest::same_content;
use crate::types::{Catalog, DuplicatePair};

/// Pairs up files present in both catalogs that are judged equivalent.
///
/// A file is a candidate when its identifier exists in both catalogs and
/// `FileRecord::equals` holds. Two files with the same identifier and size are
/// matched even if their contents differ; `filter_by_content` narrows that down.
/// The result is sorted by destination path for stable reporting only.
pub fn find_duplicates(source: &Catalog, destination: &Catalog) -> Vec<DuplicatePair> {
    let mut duplicates: Vec<DuplicatePair> = source
        .iter()
        .filter_map(|src| {
            let dst = destination.get(&src.identifier)?;
            if src.equals(dst) {
                Some(DuplicatePair {
                    source: src.path.clone(),
                    destination: dst.path.clone(),
                    size: src.size,
                })
            } else {
                debug!(
                    "{} differs in size ({} vs {} bytes)",
                    src.identifier.display(),
                    src.size,
                    dst.size
                );
                None
            }
        })
        .collect();

    duplicates.sort_by(|a, b| a.destination.cmp(&b.destination));
    duplicates
}

/// Keep only pairs whose BLAKE3 digests match.
///
/// Runs on the current rayon pool. A pair whose digest cannot be computed is
/// dropped with a warning.
pub fn filter_by_content(pairs: Vec<DuplicatePair>) -> Vec<DuplicatePair> {
    pairs
        .into_par_iter()
        .filter(|pair| match same_content(&pair.source, &pair.destination) {
            Ok(true) => true,
            Ok(false) => {
                debug!(
                    "Content differs: {} and {}",
                    pair.source.display(),
                    pair.destination.display()
                );
                false
            }
            Err(e) => {
                warn!(
                    "Could not compare {} with {}: {}",
                    pair.source.display(),
                    pair.destination.display(),
                    e
                );
                false
            }
        })
        .collect()
}
