//! Seams to the systems the engine does not own: metadata resolution,
//! transfer history and user notifications.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::batch::BatchEntry;
use super::media::{MediaRecord, MediaType, Origin, TransferMode};
use crate::error::Result;

/// Caller-supplied resolution hints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveHint {
    /// Metadata already known for the input (seeds every file)
    pub record: Option<MediaRecord>,
    /// Forces the media type of every resolved file
    pub media_type: Option<MediaType>,
}

/// Maps files to metadata. A `None` value means the file could not be identified.
#[cfg_attr(test, mockall::automock)]
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        files: &[PathBuf],
        hint: &ResolveHint,
    ) -> Result<HashMap<PathBuf, Option<MediaRecord>>>;
}

/// Persists transfer history
#[cfg_attr(test, mockall::automock)]
pub trait Recorder: Send + Sync {
    fn record_transfer(
        &self,
        origin: Origin,
        mode: TransferMode,
        src: &Path,
        dest_root: &Path,
        record: &MediaRecord,
    ) -> Result<()>;

    fn record_unknown(&self, src: &Path, target_dir: Option<PathBuf>) -> Result<()>;
}

/// Delivers user-facing messages
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, text: &str);

    fn notify_movie_transferred(
        &self,
        origin: Origin,
        record: &MediaRecord,
        file_size: u64,
        existing_count: usize,
        category_enabled: bool,
    );

    fn notify_batch_transferred(&self, entries: &[BatchEntry], origin: Origin);
}
