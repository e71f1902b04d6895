use std::path::PathBuf;

use super::path_resolver::{with_ext, Placement};
use crate::platform::FilesystemOps;

/// What already exists at a computed placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementResult {
    pub dir_exists: bool,
    pub dir: PathBuf,
    pub file_exists: bool,
    /// Concrete `stem + ext` when a file exists, otherwise the bare stem
    pub file: PathBuf,
}

/// Check the placement directory and `stem + ext` for each extension in order.
/// The first extension that exists wins.
pub fn probe(fs: &dyn FilesystemOps, placement: &Placement, exts: &[String]) -> PlacementResult {
    let dir_exists = fs.exists(&placement.dir);

    let existing = exts
        .iter()
        .map(|ext| with_ext(&placement.stem, ext))
        .find(|candidate| {
            log::debug!("Checking {:?}", candidate);
            fs.exists(candidate)
        });

    PlacementResult {
        dir_exists,
        dir: placement.dir.clone(),
        file_exists: existing.is_some(),
        file: existing.unwrap_or_else(|| placement.stem.clone()),
    }
}
