// RMT Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, RmtError};

// Module declarations
pub mod adapters;
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;
pub use core::{
    MediaRecord, MediaType, Origin, TransferMode, TransferRequest, TransferService,
    TransferSummary,
};

// Initialize logging (info unless RUST_LOG says otherwise)
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
