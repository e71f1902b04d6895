//! Filesystem side of a transfer: copy or link a file into the library,
//! bring its subtitle sidecars along, copy bluray folders wholesale and
//! park unidentified files under `.unknown`.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use regex::Regex;

use super::config::has_ext_in;
use super::media::TransferMode;
use super::path_resolver::with_ext;
use crate::error::{Result, RmtError};
use crate::platform::FilesystemOps;

/// Folder that holds files without usable metadata
pub const UNKNOWN_DIR: &str = ".unknown";

/// Language marker between a subtitle's base name and its extension (`.zh-cn`, `.eng`)
static LOCALE_INFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.[A-Za-z]{2,3}(-[A-Za-z]{2,4})?$").expect("valid locale regex"));

pub struct TransferExecutor {
    fs: Arc<dyn FilesystemOps>,
    /// Serializes copy-mode check/delete/copy sequences across concurrent runs
    copy_lock: Mutex<()>,
    subtitle_exts: Vec<String>,
    /// Top-level library roots; never removed when moving a bluray folder
    protected_roots: Vec<PathBuf>,
}

impl TransferExecutor {
    pub fn new(
        fs: Arc<dyn FilesystemOps>,
        subtitle_exts: Vec<String>,
        protected_roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            fs,
            copy_lock: Mutex::new(()),
            subtitle_exts,
            protected_roots,
        }
    }

    /// Link modes run unlocked
    fn guard(&self, mode: TransferMode) -> Option<MutexGuard<'_, ()>> {
        (mode == TransferMode::Copy).then(|| self.copy_lock.lock())
    }

    fn place(&self, src: &Path, dst: &Path, mode: TransferMode) -> Result<()> {
        match mode {
            TransferMode::Copy => self.fs.copy_file(src, dst),
            TransferMode::HardLink => self.fs.hard_link(src, dst),
            TransferMode::SoftLink => self.fs.symlink(src, dst),
        }
    }

    /// Transfer one media file, then its subtitles
    pub fn transfer_file(
        &self,
        src: &Path,
        dst: &Path,
        overwrite: bool,
        mode: TransferMode,
    ) -> Result<()> {
        self.execute(src, dst, None, overwrite, mode)
    }

    /// Delete `existing` and transfer `src` to `dst` in one locked step
    ///
    /// `dst` may differ from `existing` when the incoming file has another extension.
    pub fn replace_file(
        &self,
        src: &Path,
        existing: &Path,
        dst: &Path,
        mode: TransferMode,
    ) -> Result<()> {
        self.execute(src, dst, Some(existing), true, mode)
    }

    fn execute(
        &self,
        src: &Path,
        dst: &Path,
        superseded: Option<&Path>,
        overwrite: bool,
        mode: TransferMode,
    ) -> Result<()> {
        {
            let _guard = self.guard(mode);

            if let Some(existing) = superseded.filter(|p| self.fs.is_file(p)) {
                log::info!("Removing superseded file {:?}", existing);
                self.fs.remove_file(existing)?;
            }

            if self.fs.exists(dst) {
                if !overwrite {
                    return Err(RmtError::FilesystemOp(format!(
                        "{} already exists",
                        dst.display()
                    )));
                }
                if self.fs.is_file(dst) {
                    log::info!("Removing existing file {:?}", dst);
                    self.fs.remove_file(dst)?;
                }
            }

            log::info!("{} {:?} -> {:?}", mode, src, dst);
            self.place(src, dst, mode)?;
        }

        self.transfer_subtitles(src, dst, mode);
        Ok(())
    }

    /// Bring sidecars named after `src` next to `dst`, renamed to match
    ///
    /// Returns how many were transferred. Failures are logged only.
    pub fn transfer_subtitles(&self, src: &Path, dst: &Path, mode: TransferMode) -> usize {
        let (Some(dir), Some(src_stem)) = (src.parent(), src.file_stem()) else {
            return 0;
        };
        let src_stem = src_stem.to_string_lossy();

        let entries = match self.fs.list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot scan {:?} for subtitles: {}", dir, e);
                return 0;
            }
        };

        let dst_stem = dst.with_extension("");
        let mut transferred = 0;

        for sub in entries
            .iter()
            .filter(|p| has_ext_in(p, &self.subtitle_exts) && self.fs.is_file(p))
        {
            let (Some(sub_stem), Some(sub_ext)) = (sub.file_stem(), sub.extension()) else {
                continue;
            };
            let sub_stem = sub_stem.to_string_lossy();
            let Some(rest) = sub_stem.strip_prefix(src_stem.as_ref()) else {
                continue;
            };

            // Same base name, optionally followed by a language marker
            if !rest.is_empty() && !LOCALE_INFIX.is_match(rest) {
                continue;
            }
            let infix = rest;
            let new_sub = with_ext(
                &dst_stem,
                &format!("{}.{}", infix, sub_ext.to_string_lossy()),
            );

            if self.fs.exists(&new_sub) {
                log::info!("Subtitle {:?} already exists", new_sub);
                continue;
            }

            let result = {
                let _guard = self.guard(mode);
                self.place(sub, &new_sub, mode)
            };
            match result {
                Ok(()) => {
                    log::info!("Subtitle {:?} -> {:?}", sub, new_sub);
                    transferred += 1;
                }
                Err(e) => log::error!("Subtitle transfer failed for {:?}: {}", sub, e),
            }
        }

        if transferred == 0 {
            log::debug!("No subtitles transferred for {:?}", src);
        }
        transferred
    }

    /// Copy a bluray folder as one unit; always locked whatever the mode
    pub fn transfer_bluray_dir(
        &self,
        src: &Path,
        dst: &Path,
        move_source: bool,
        overwrite: bool,
    ) -> Result<()> {
        {
            let _guard = self.copy_lock.lock();

            if self.fs.exists(dst) {
                if !overwrite {
                    return Err(RmtError::FilesystemOp(format!(
                        "{} already exists",
                        dst.display()
                    )));
                }
                log::warn!("Removing existing directory {:?}", dst);
                self.fs.remove_dir_all(dst)?;
            }

            log::info!("Copying directory {:?} -> {:?}", src, dst);
            self.fs.copy_dir_all(src, dst)?;
        }

        if move_source {
            if self.protected_roots.iter().any(|root| root == src) {
                log::warn!("Refusing to remove library root {:?}", src);
            } else {
                self.fs.remove_dir_all(src)?;
                log::info!("Removed {:?}", src);
            }
        }
        Ok(())
    }

    /// Place an unidentified file at `<target>/.unknown/<parent name>/<file name>`
    pub fn transfer_origin_file(
        &self,
        src: &Path,
        target_dir: &Path,
        mode: TransferMode,
    ) -> Result<PathBuf> {
        if self.fs.is_dir(src) {
            return Err(RmtError::policy(format!(
                "{} is a directory; only files keep their original name",
                src.display()
            )));
        }

        let file_name = src
            .file_name()
            .ok_or_else(|| RmtError::input(format!("{} has no file name", src.display())))?;
        let parent_name = src
            .parent()
            .and_then(|p| p.file_name())
            .ok_or_else(|| RmtError::input(format!("{} has no parent folder", src.display())))?;

        let unknown_dir = if has_unknown_segment(target_dir) {
            target_dir.to_path_buf()
        } else {
            target_dir.join(UNKNOWN_DIR)
        };
        let dir = unknown_dir.join(parent_name);
        if !self.fs.exists(&dir) {
            log::debug!("Creating {:?}", dir);
            self.fs.create_dir_all(&dir)?;
        }

        let dst = dir.join(file_name);
        {
            let _guard = self.guard(mode);
            if self.fs.exists(&dst) {
                return Err(RmtError::FilesystemOp(format!(
                    "{} already exists",
                    dst.display()
                )));
            }
            self.place(src, &dst, mode)?;
        }

        log::info!("{} {:?} to unknown folder", mode, file_name);
        Ok(dst)
    }
}

fn has_unknown_segment(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == UNKNOWN_DIR))
}
