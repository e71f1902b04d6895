// Filesystem primitives used by the transfer engine

use crate::error::{Result, RmtError};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::disk;

/// Folder names that mark recycle bins or NAS metadata
const INVALID_DIR_NAMES: &[&str] = &["@recycle", "#recycle", "$recycle.bin", "@eadir"];

/// Filesystem operations the engine performs
///
/// `LocalFs` is the native implementation; tests can wrap it to inject
/// failures or report a different amount of free space.
pub trait FilesystemOps: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    /// File length, or the recursive byte total of a directory
    fn size(&self, path: &Path) -> Result<u64>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;
    fn hard_link(&self, src: &Path, dst: &Path) -> Result<()>;
    fn symlink(&self, src: &Path, dst: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Recursively copy `src` to `dst`, creating `dst`
    fn copy_dir_all(&self, src: &Path, dst: &Path) -> Result<()>;
    fn rename(&self, src: &Path, dst: &Path) -> Result<()>;
    /// Direct children of `dir`, sorted by path
    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// Every regular file below `dir`, sorted by path
    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// Free bytes on the disk holding `path`, if it can be determined
    fn available_space(&self, path: &Path) -> Option<u64>;
}

/// Native filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn size(&self, path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path).map_err(|e| RmtError::fs_op("stat", path, e))?;
        if !metadata.is_dir() {
            return Ok(metadata.len());
        }
        let mut total = 0;
        for file in self.walk_files(path)? {
            total += fs::metadata(&file)
                .map_err(|e| RmtError::fs_op("stat", &file, e))?
                .len();
        }
        Ok(total)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| RmtError::fs_op("create directory", path, e))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        fs::copy(src, dst)
            .map(|_| ())
            .map_err(|e| RmtError::fs_op("copy to", dst, e))
    }

    fn hard_link(&self, src: &Path, dst: &Path) -> Result<()> {
        fs::hard_link(src, dst).map_err(|e| RmtError::fs_op("hard link to", dst, e))
    }

    fn symlink(&self, src: &Path, dst: &Path) -> Result<()> {
        let target = absolute(src)?;
        create_symlink(&target, dst).map_err(|e| RmtError::fs_op("soft link to", dst, e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| RmtError::fs_op("remove", path, e))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| RmtError::fs_op("remove directory", path, e))
    }

    fn copy_dir_all(&self, src: &Path, dst: &Path) -> Result<()> {
        self.create_dir_all(dst)?;
        let entries = fs::read_dir(src).map_err(|e| RmtError::fs_op("read directory", src, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| RmtError::fs_op("read directory", src, e))?;
            let from = entry.path();
            let to = dst.join(entry.file_name());
            let file_type = entry
                .file_type()
                .map_err(|e| RmtError::fs_op("stat", &from, e))?;
            if file_type.is_dir() {
                self.copy_dir_all(&from, &to)?;
            } else {
                self.copy_file(&from, &to)?;
            }
        }
        Ok(())
    }

    fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        fs::rename(src, dst).map_err(|e| RmtError::fs_op("move to", dst, e))
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| RmtError::fs_op("read directory", dir, e))?;
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();
        Ok(paths)
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|t| t.is_file()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => log::warn!("Skipping unreadable entry under {:?}: {}", dir, e),
            }
        }
        Ok(files)
    }

    fn available_space(&self, path: &Path) -> Option<u64> {
        disk::available_space(path)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

#[cfg(unix)]
fn create_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn create_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

/// Paths inside recycle bins, NAS metadata folders or hidden folders are never processed
pub fn is_invalid_path(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            let lower = name.to_lowercase();
            name.starts_with('.') || INVALID_DIR_NAMES.contains(&lower.as_str())
        }
        _ => false,
    })
}

/// Whether `path` lies at or below `root`
pub fn is_path_in_path(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}
