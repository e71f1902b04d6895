//! Per-run aggregation of TV/anime transfers into one message per title.

use std::collections::BTreeSet;

use super::collaborators::Notifier;
use super::media::{MediaRecord, MediaType, Origin};

/// Everything transferred for one title during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub title_string: String,
    pub record: MediaRecord,
    pub seasons: BTreeSet<u32>,
    pub episodes: BTreeSet<u32>,
    pub total_size: u64,
    pub category_enabled: bool,
    pub media_type: MediaType,
}

/// Accumulates entries keyed by title string, in first-seen order
#[derive(Debug, Default)]
pub struct BatchAggregator {
    entries: Vec<BatchEntry>,
}

impl BatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one transferred file into the entry for its title
    pub fn add(&mut self, record: &MediaRecord, file_size: u64, category_enabled: bool) {
        let key = record.title_string();
        let idx = match self.entries.iter().position(|e| e.title_string == key) {
            Some(idx) => idx,
            None => {
                self.entries.push(BatchEntry {
                    title_string: key,
                    record: record.clone(),
                    seasons: BTreeSet::new(),
                    episodes: BTreeSet::new(),
                    total_size: 0,
                    category_enabled,
                    media_type: record.media_type,
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[idx];
        entry.total_size += file_size;
        entry.seasons.extend(record.seasons.iter().copied());
        entry.episodes.extend(record.episodes.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Send the consolidated notification; consumes the aggregator so a run flushes once
    pub fn flush(self, notifier: &dyn Notifier, origin: Origin) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        log::debug!("Flushing {} batched title(s)", self.entries.len());
        notifier.notify_batch_transferred(&self.entries, origin);
        self.entries.len()
    }
}
