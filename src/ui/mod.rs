// UI and formatting module

pub mod formatters;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_episodes, format_seasons, format_size, format_summary};
pub use prompts::{dimmed, error, info, success, warn};
