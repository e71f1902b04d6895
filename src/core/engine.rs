//! The transfer service: one call places everything found under an input path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::batch::BatchAggregator;
use super::collaborators::{Notifier, Recorder, ResolveHint, Resolver};
use super::config::Config;
use super::conflict::{decide, Decision};
use super::existence;
use super::media::{MediaRecord, MediaType, Origin, TransferMode};
use super::path_resolver::{self, with_ext, PathResolver};
use super::transfer::TransferExecutor;
use crate::error::{Result, RmtError};
use crate::platform::{bytes_to_gb, is_invalid_path, is_path_in_path, FilesystemOps, LocalFs};

/// Trailers and preview clips
static SAMPLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[./\s\[]+Sample[/.\s\]]+").expect("valid sample regex"));

/// Marker file of a bluray disk folder
const BLURAY_MARKER: &str = "BDMV/index.bdmv";

/// One invocation of [`TransferService::transfer_media`]
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub origin: Origin,
    pub path: PathBuf,
    /// Overrides the per-type library root
    pub target_dir: Option<PathBuf>,
    /// Metadata known up front, passed to the resolver as a seed
    pub record: Option<MediaRecord>,
    pub media_type: Option<MediaType>,
}

impl TransferRequest {
    pub fn new(origin: Origin, path: impl Into<PathBuf>) -> Self {
        Self {
            origin,
            path: path.into(),
            target_dir: None,
            record: None,
            media_type: None,
        }
    }

    pub fn with_target_dir(mut self, target_dir: Option<PathBuf>) -> Self {
        self.target_dir = target_dir;
        self
    }

    pub fn with_record(mut self, record: MediaRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// Files considered, samples excluded
    pub total: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files placed or parked whose history write failed
    pub unrecorded: usize,
}

/// Result for one first-level entry of a manual or sync run
#[derive(Debug)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub result: Result<TransferSummary>,
}

enum Candidate {
    Sample(PathBuf),
    Unidentified(PathBuf),
    Media {
        file: PathBuf,
        record: MediaRecord,
        root: PathBuf,
    },
}

enum FileOutcome {
    Transferred { size: u64, existing_count: usize },
    Skipped,
}

pub struct TransferService {
    config: Config,
    resolver: Arc<dyn Resolver>,
    recorder: Arc<dyn Recorder>,
    notifier: Arc<dyn Notifier>,
    fs: Arc<dyn FilesystemOps>,
    executor: TransferExecutor,
}

impl TransferService {
    pub fn new(
        config: Config,
        resolver: Arc<dyn Resolver>,
        recorder: Arc<dyn Recorder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let fs: Arc<dyn FilesystemOps> = Arc::new(LocalFs::new());
        let executor = Self::build_executor(&config, fs.clone());
        Self {
            config,
            resolver,
            recorder,
            notifier,
            fs,
            executor,
        }
    }

    /// Swap the filesystem implementation
    pub fn with_filesystem(mut self, fs: Arc<dyn FilesystemOps>) -> Self {
        self.executor = Self::build_executor(&self.config, fs.clone());
        self.fs = fs;
        self
    }

    fn build_executor(config: &Config, fs: Arc<dyn FilesystemOps>) -> TransferExecutor {
        TransferExecutor::new(
            fs,
            config.media.subtitle_exts.clone(),
            config.media.library_roots(),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Place every media file found under `request.path`
    ///
    /// Per-file failures are counted in the summary. A missing destination
    /// root or a disk under the free-space floor aborts the run before any
    /// file is touched.
    pub fn transfer_media(&self, request: &TransferRequest) -> Result<TransferSummary> {
        let raw = request.path.to_string_lossy();
        if raw.trim().is_empty() {
            return Err(RmtError::input("empty input path"));
        }
        let in_path = PathBuf::from(raw.replace('\\', "/"));

        if is_invalid_path(&in_path) {
            return Err(RmtError::input(format!(
                "{} is in a recycle bin or hidden folder",
                in_path.display()
            )));
        }

        let mode = self.config.transfer_mode(request.origin);
        log::info!("Processing {:?} ({}, {})", in_path, request.origin, mode);

        let (files, is_bluray) = self.collect_files(&in_path, mode)?;
        log::debug!("Candidate files: {:?}", files);

        let hint = ResolveHint {
            record: request.record.clone(),
            media_type: request.media_type,
        };
        let resolved = self
            .resolver
            .resolve(&files, &hint)
            .map_err(|e| RmtError::metadata(format!("resolver failed: {}", e)))?;
        if resolved.is_empty() {
            return Err(RmtError::metadata(format!(
                "no media information for {}",
                in_path.display()
            )));
        }

        let candidates = self.plan(files, resolved, request.target_dir.as_deref());
        self.preflight(&candidates)?;

        let mut summary = TransferSummary::default();
        let mut batch = BatchAggregator::new();

        for candidate in candidates {
            let (file, record, root) = match candidate {
                Candidate::Sample(file) => {
                    log::warn!("{:?} looks like a sample, skipping", file);
                    continue;
                }
                Candidate::Unidentified(file) => {
                    summary.total += 1;
                    summary.failed += 1;
                    if !self.handle_unidentified(&file, request.target_dir.as_deref(), mode) {
                        summary.unrecorded += 1;
                    }
                    continue;
                }
                Candidate::Media { file, record, root } => (file, record, root),
            };
            summary.total += 1;

            match self.transfer_one(&file, &record, &root, mode, is_bluray) {
                Ok(FileOutcome::Transferred {
                    size,
                    existing_count,
                }) => {
                    summary.transferred += 1;
                    if let Err(e) =
                        self.recorder
                            .record_transfer(request.origin, mode, &file, &root, &record)
                    {
                        log::error!("Could not record transfer of {:?}: {}", file, e);
                        summary.unrecorded += 1;
                    }

                    let category_enabled = self.config.media.category_enabled(record.media_type);
                    if record.media_type == MediaType::Movie {
                        self.notifier.notify_movie_transferred(
                            request.origin,
                            &record,
                            size,
                            existing_count,
                            category_enabled,
                        );
                    } else {
                        batch.add(&record, size, category_enabled);
                    }
                    log::info!("{:?} transferred", file);
                }
                Ok(FileOutcome::Skipped) => summary.skipped += 1,
                Err(e) if e.is_batch_fatal() => return Err(e),
                Err(e) => {
                    log::error!("{:?} failed: {}", file, e);
                    summary.failed += 1;
                }
            }
        }

        batch.flush(self.notifier.as_ref(), request.origin);

        log::info!(
            "{:?} done: {} total, {} transferred, {} skipped, {} failed",
            in_path,
            summary.total,
            summary.transferred,
            summary.skipped,
            summary.failed
        );
        if summary.unrecorded > 0 {
            log::warn!(
                "{} file(s) under {:?} are missing from the transfer history",
                summary.unrecorded,
                in_path
            );
        }
        Ok(summary)
    }

    /// Files to resolve, and whether the input is a bluray folder
    fn collect_files(&self, in_path: &Path, mode: TransferMode) -> Result<(Vec<PathBuf>, bool)> {
        let media = &self.config.media;

        if self.fs.is_dir(in_path) {
            if self.fs.exists(&in_path.join(BLURAY_MARKER)) {
                if mode == TransferMode::HardLink {
                    return Err(RmtError::policy(
                        "bluray folders cannot be transferred as hard links",
                    ));
                }
                log::info!("{:?} is a bluray folder", in_path);
                return Ok((vec![in_path.to_path_buf()], true));
            }

            let files: Vec<PathBuf> = self
                .fs
                .walk_files(in_path)?
                .into_iter()
                .filter(|f| media.is_media_ext(f))
                .collect();
            if files.is_empty() {
                return Err(RmtError::not_found(format!(
                    "no media files under {}",
                    in_path.display()
                )));
            }
            return Ok((files, false));
        }

        if !self.fs.exists(in_path) {
            return Err(RmtError::input(format!(
                "{} does not exist",
                in_path.display()
            )));
        }
        if !media.is_media_ext(in_path) {
            return Err(RmtError::input(format!(
                "unsupported media format: {}",
                in_path.display()
            )));
        }
        Ok((vec![in_path.to_path_buf()], false))
    }

    /// Pair each file with its record and destination root, in enumeration order
    fn plan(
        &self,
        files: Vec<PathBuf>,
        mut resolved: HashMap<PathBuf, Option<MediaRecord>>,
        target_dir: Option<&Path>,
    ) -> Vec<Candidate> {
        let media = &self.config.media;

        files
            .into_iter()
            .map(|file| {
                if SAMPLE_PATTERN.is_match(&file.to_string_lossy()) {
                    return Candidate::Sample(file);
                }

                let record = resolved.remove(&file).flatten();
                let Some(mut record) = record.filter(|r| r.media_type != MediaType::Unknown)
                else {
                    return Candidate::Unidentified(file);
                };

                if record.media_type == MediaType::Anime && media.root_for(MediaType::Anime).is_none()
                {
                    record.media_type = MediaType::Tv;
                }

                let root = match target_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => media.root_for(record.media_type).unwrap_or_default(),
                };
                Candidate::Media { file, record, root }
            })
            .collect()
    }

    /// Check every destination root before transferring anything
    fn preflight(&self, candidates: &[Candidate]) -> Result<()> {
        let mut roots: Vec<(&Path, MediaType)> = Vec::new();
        for candidate in candidates {
            if let Candidate::Media { root, record, .. } = candidate {
                if !roots.iter().any(|(r, _)| *r == root.as_path()) {
                    roots.push((root.as_path(), record.media_type));
                }
            }
        }

        let floor = self.config.media.min_free_space_gb;
        for (root, media_type) in roots {
            if root.as_os_str().is_empty() {
                return Err(RmtError::destination(format!(
                    "no library root configured for {}",
                    media_type
                )));
            }
            if !self.fs.exists(root) {
                return Err(RmtError::destination(format!(
                    "{} does not exist",
                    root.display()
                )));
            }

            match self.fs.available_space(root) {
                Some(bytes) if bytes_to_gb(bytes) < floor => {
                    log::error!("Less than {} GB free in {:?}", floor, root);
                    self.notifier.notify(
                        "Low disk space",
                        &format!("Less than {} GB free in {}", floor, root.display()),
                    );
                    return Err(RmtError::capacity(root, floor));
                }
                Some(_) => {}
                None => log::warn!("Cannot determine free space for {:?}", root),
            }
        }
        Ok(())
    }

    fn transfer_one(
        &self,
        file: &Path,
        record: &MediaRecord,
        root: &Path,
        mode: TransferMode,
        is_bluray: bool,
    ) -> Result<FileOutcome> {
        let media = &self.config.media;
        let size = self.fs.size(file)?;

        let placement = PathResolver::new(media, self.fs.as_ref()).resolve(root, record)?;
        let probe = existence::probe(self.fs.as_ref(), &placement, &media.media_exts);
        let existing_size = if probe.file_exists {
            self.fs.size(&probe.file).ok()
        } else {
            None
        };

        let dst = with_ext(&placement.stem, &extension_of(file));
        let existing_count = match decide(mode, is_bluray, &probe, size, existing_size) {
            Decision::Skip(reason) => {
                log::warn!("Skipping {:?}: {}", file, reason);
                return Ok(FileOutcome::Skipped);
            }
            Decision::Replace => {
                log::info!(
                    "{:?} exists but the new file is larger, replacing",
                    probe.file
                );
                self.executor.replace_file(file, &probe.file, &dst, mode)?;
                1
            }
            Decision::Place if is_bluray => {
                self.executor
                    .transfer_bluray_dir(file, &placement.dir, false, false)?;
                0
            }
            Decision::Place => {
                if !probe.dir_exists {
                    log::debug!("Creating {:?}", placement.dir);
                    self.fs.create_dir_all(&placement.dir)?;
                }
                self.executor.transfer_file(file, &dst, false, mode)?;
                0
            }
        };

        Ok(FileOutcome::Transferred {
            size,
            existing_count,
        })
    }

    /// Record and park an unidentified file; returns whether the record was written
    fn handle_unidentified(
        &self,
        file: &Path,
        target_dir: Option<&Path>,
        mode: TransferMode,
    ) -> bool {
        log::warn!("Cannot identify {:?}", file);
        let recorded = match self
            .recorder
            .record_unknown(file, target_dir.map(Path::to_path_buf))
        {
            Ok(()) => true,
            Err(e) => {
                log::error!("Could not record unknown file {:?}: {}", file, e);
                false
            }
        };

        let fallback = target_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.media.root_for(MediaType::Unknown));
        let Some(fallback) = fallback else {
            log::error!("{:?} failed: no unknown folder configured", file);
            return recorded;
        };

        match self.executor.transfer_origin_file(file, &fallback, mode) {
            Ok(dst) => log::info!("{:?} kept its name at {:?}", file, dst),
            Err(e) => log::error!("Fallback transfer of {:?} failed: {}", file, e),
        }
        recorded
    }

    /// Transfer each first-level entry of `source` as a manual run
    pub fn transfer_manually(
        &self,
        source: &Path,
        target: Option<&Path>,
    ) -> Result<Vec<EntryOutcome>> {
        if !self.fs.exists(source) {
            return Err(RmtError::input(format!(
                "source {} does not exist",
                source.display()
            )));
        }
        if let Some(target) = target {
            if !self.fs.exists(target) {
                return Err(RmtError::destination(format!(
                    "target {} does not exist",
                    target.display()
                )));
            }
        }

        log::info!(
            "Transferring everything under {:?} ({})",
            source,
            self.config.transfer_mode(Origin::Manual)
        );
        let outcomes = self
            .first_level_media(source)?
            .into_iter()
            .map(|path| {
                let request = TransferRequest::new(Origin::Manual, &path)
                    .with_target_dir(target.map(Path::to_path_buf));
                let result = self.transfer_media(&request);
                EntryOutcome { path, result }
            })
            .collect();
        Ok(outcomes)
    }

    /// Run every configured sync root
    pub fn transfer_all_sync(&self) -> Vec<EntryOutcome> {
        let mut outcomes = Vec::new();
        for root in self.config.sync.roots() {
            log::info!("Syncing {:?}", root.source);
            let entries = match self.first_level_media(&root.source) {
                Ok(entries) => entries,
                Err(e) => {
                    log::error!("Cannot read sync root {:?}: {}", root.source, e);
                    continue;
                }
            };

            for path in entries {
                let request = TransferRequest::new(Origin::Monitor, &path)
                    .with_target_dir(root.target.clone());
                let result = self.transfer_media(&request);
                match &result {
                    Ok(_) => log::info!("{:?} synced", path),
                    Err(e) => log::error!("{:?} failed: {}", path, e),
                }
                outcomes.push(EntryOutcome { path, result });
            }
        }
        outcomes
    }

    /// Directories and media files directly under `dir`
    fn first_level_media(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.fs.list_dir(dir)?;
        Ok(entries
            .into_iter()
            .filter(|p| {
                let hidden = p
                    .file_name()
                    .map(|n| is_invalid_path(Path::new(n)))
                    .unwrap_or(true);
                !hidden && (self.fs.is_dir(p) || self.config.media.is_media_ext(p))
            })
            .collect())
    }

    /// Move a favorited movie folder into the favorites folder
    ///
    /// Returns the category it came from, or `None` when nothing moved.
    pub fn transfer_favorite(&self, item_path: &Path) -> Result<Option<String>> {
        let media = &self.config.media;
        if !media.movie_category {
            return Ok(None);
        }
        let Some(movie_root) = media.root_for(MediaType::Movie) else {
            return Ok(None);
        };

        let movie_dir = if self.fs.is_dir(item_path) {
            item_path
        } else {
            match item_path.parent() {
                Some(parent) => parent,
                None => return Ok(None),
            }
        };
        if movie_dir == movie_root.as_path() || !is_path_in_path(&movie_root, movie_dir) {
            return Ok(None);
        }

        let (Some(name), Some(category)) = (
            movie_dir.file_name(),
            movie_dir.parent().and_then(|p| p.file_name()),
        ) else {
            return Ok(None);
        };
        let category = category.to_string_lossy().into_owned();
        if category == media.favorite_dir {
            return Ok(None);
        }

        let favorites = movie_root.join(&media.favorite_dir);
        let new_path = favorites.join(name);
        if self.fs.exists(&new_path) {
            log::info!("{:?} already exists", new_path);
            return Ok(None);
        }

        log::info!("Moving {:?} to {:?}", movie_dir, new_path);
        self.fs.create_dir_all(&favorites)?;
        self.fs.rename(movie_dir, &new_path)?;
        Ok(Some(category))
    }

    /// Prospective library folder for a title, without touching the disk
    pub fn resolve_destination_path(
        &self,
        root: &Path,
        media_type: MediaType,
        title: &str,
        year: Option<u32>,
        category: Option<&str>,
        season_label: Option<&str>,
    ) -> Option<PathBuf> {
        path_resolver::resolve_destination_path(
            &self.config.media,
            root,
            media_type,
            title,
            year,
            category,
            season_label,
        )
    }

    /// Whether the library already holds everything `record` describes
    pub fn is_media_file_exists(&self, record: &MediaRecord) -> bool {
        let media = &self.config.media;
        let Some(root) = media.root_for(record.media_type) else {
            return false;
        };
        let title_string = record.title_string();

        match record.media_type {
            MediaType::Unknown => false,
            MediaType::Movie => {
                if !media.movie_category {
                    return self.fs.exists(&root.join(&title_string));
                }
                self.fs
                    .exists(&root.join(&media.favorite_dir).join(&title_string))
                    || self
                        .fs
                        .exists(&root.join(&record.category).join(&title_string))
            }
            MediaType::Tv | MediaType::Anime => {
                let base = if media.category_enabled(record.media_type) {
                    root.join(&record.category).join(&title_string)
                } else {
                    root.join(&title_string)
                };
                if record.seasons.is_empty() {
                    return self.fs.exists(&base);
                }

                let part = record
                    .part
                    .as_ref()
                    .map(|p| format!("-{}", p))
                    .unwrap_or_default();

                record.seasons.iter().filter(|s| **s > 0).all(|season| {
                    let season_dir = base.join(format!("Season {}", season));
                    if record.episodes.is_empty() {
                        return self.fs.exists(&season_dir);
                    }
                    record.episodes.iter().filter(|e| **e > 0).all(|episode| {
                        let stem = season_dir.join(format!(
                            "{}{} - S{:02}E{:02} - 第 {} 集",
                            record.title, part, season, episode, episode
                        ));
                        media
                            .media_exts
                            .iter()
                            .any(|ext| self.fs.exists(&with_ext(&stem, ext)))
                    })
                })
            }
        }
    }

    /// Whether `path` is inside one of the library roots
    pub fn is_target_dir_path(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }
        self.config
            .media
            .library_roots()
            .iter()
            .any(|root| is_path_in_path(root, path))
    }
}

/// `.ext` of a file, or empty
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
