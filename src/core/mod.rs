// Core placement and transfer logic

pub mod batch;
pub mod collaborators;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod existence;
pub mod media;
pub mod path_resolver;
pub mod transfer;

// Re-export commonly used items
pub use batch::{BatchAggregator, BatchEntry};
pub use collaborators::{Notifier, Recorder, ResolveHint, Resolver};
pub use config::Config;
pub use engine::{EntryOutcome, TransferRequest, TransferService, TransferSummary};
pub use media::{MediaRecord, MediaType, Origin, TransferMode};
pub use transfer::TransferExecutor;
