// Default collaborators wired in by the command-line front end

pub mod filename_resolver;
pub mod log_notifier;
pub mod sqlite_recorder;

pub use filename_resolver::FilenameResolver;
pub use log_notifier::LogNotifier;
pub use sqlite_recorder::{HistoryEntry, SqliteRecorder};
