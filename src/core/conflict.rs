//! Skip-or-replace policy when the destination already holds a copy.
//!
//! Size is the quality proxy, and only in copy mode: a linked destination
//! shares its bytes with a source file, so it is never swapped out.

use super::existence::PlacementResult;
use super::media::TransferMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing in the way
    Place,
    /// Existing file is smaller; delete it and transfer
    Replace,
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlurayExists,
    NotLarger,
    LinkedExisting,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::BlurayExists => "bluray folder already exists",
            SkipReason::NotLarger => "existing file is the same size or larger",
            SkipReason::LinkedExisting => "file already exists",
        };
        f.write_str(text)
    }
}

/// `existing_size` is only consulted when a file exists
pub fn decide(
    mode: TransferMode,
    is_bluray: bool,
    probe: &PlacementResult,
    incoming_size: u64,
    existing_size: Option<u64>,
) -> Decision {
    if !probe.dir_exists {
        return Decision::Place;
    }
    if is_bluray {
        return Decision::Skip(SkipReason::BlurayExists);
    }
    if !probe.file_exists {
        return Decision::Place;
    }

    match mode {
        TransferMode::Copy => match existing_size {
            Some(existing) if incoming_size > existing => Decision::Replace,
            _ => Decision::Skip(SkipReason::NotLarger),
        },
        TransferMode::HardLink | TransferMode::SoftLink => {
            Decision::Skip(SkipReason::LinkedExisting)
        }
    }
}
