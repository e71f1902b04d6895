// Platform-specific code module

pub mod disk;
pub mod fs;

// Re-exports para imports limpios
pub use disk::{available_space, bytes_to_gb};
pub use fs::{is_invalid_path, is_path_in_path, FilesystemOps, LocalFs};
