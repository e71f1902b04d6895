use crate::core::batch::BatchEntry;
use crate::core::collaborators::Notifier;
use crate::core::media::{MediaRecord, MediaType, Origin};
use crate::ui::{format_episodes, format_seasons, format_size};

/// Delivers notifications as log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn movie_message(
        origin: Origin,
        record: &MediaRecord,
        file_size: u64,
        existing_count: usize,
        category_enabled: bool,
    ) -> String {
        let mut text = format!(
            "[{}] {} added to the library ({})",
            origin,
            record.title_string(),
            format_size(file_size)
        );
        if category_enabled && !record.category.is_empty() {
            text.push_str(&format!(", category {}", record.category));
        }
        if let Some(tag) = &record.resource_tag {
            text.push_str(&format!(", {}", tag));
        }
        if existing_count > 0 {
            text.push_str(", replaced an existing copy");
        }
        text
    }

    pub fn batch_message(entry: &BatchEntry, origin: Origin) -> String {
        let kind = match entry.media_type {
            MediaType::Anime => "Anime",
            _ => "TV",
        };
        let mut text = format!(
            "[{}] {} {} {} {} added ({})",
            origin,
            kind,
            entry.title_string,
            format_seasons(&entry.seasons),
            format_episodes(&entry.episodes),
            format_size(entry.total_size)
        );
        if entry.category_enabled && !entry.record.category.is_empty() {
            text.push_str(&format!(", category {}", entry.record.category));
        }
        text
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, text: &str) {
        log::warn!("{}: {}", title, text);
    }

    fn notify_movie_transferred(
        &self,
        origin: Origin,
        record: &MediaRecord,
        file_size: u64,
        existing_count: usize,
        category_enabled: bool,
    ) {
        log::info!(
            "{}",
            Self::movie_message(origin, record, file_size, existing_count, category_enabled)
        );
    }

    fn notify_batch_transferred(&self, entries: &[BatchEntry], origin: Origin) {
        for entry in entries {
            log::info!("{}", Self::batch_message(entry, origin));
        }
    }
}
