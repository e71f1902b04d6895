// Shared fixtures: a temporary library and recording collaborators
#![allow(dead_code)]


use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use rmt::core::batch::BatchEntry;
use rmt::core::collaborators::{Notifier, Recorder, ResolveHint, Resolver};
use rmt::core::config::MediaConfig;
use rmt::platform::{FilesystemOps, LocalFs};
use rmt::{Config, MediaRecord, Origin, TransferMode, TransferService};

/// Temporary tree with `downloads/` and one folder per library root
pub struct Library {
    pub dir: TempDir,
}

impl Library {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new().prefix("rmt-it").tempdir().unwrap();
        for sub in ["downloads", "movies", "tv", "unknown"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file (creating parents) and return its path
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.media = MediaConfig {
            movie_path: Some(self.path("movies").to_string_lossy().into_owned()),
            tv_path: Some(self.path("tv").to_string_lossy().into_owned()),
            unknown_path: Some(self.path("unknown").to_string_lossy().into_owned()),
            min_free_space_gb: 0.0,
            ..Default::default()
        };
        config
    }

    pub fn config_with_mode(&self, mode: TransferMode) -> Config {
        let mut config = self.config();
        config.transfer.downloader = mode;
        config.transfer.sync = mode;
        config
    }
}

/// Resolves by file (or folder) name; anything unlisted is unidentified
#[derive(Default)]
pub struct StaticResolver {
    records: HashMap<String, MediaRecord>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, record: MediaRecord) -> Self {
        self.records.insert(name.to_string(), record);
        self
    }
}

impl Resolver for StaticResolver {
    fn resolve(
        &self,
        files: &[PathBuf],
        _hint: &ResolveHint,
    ) -> rmt::Result<HashMap<PathBuf, Option<MediaRecord>>> {
        Ok(files
            .iter()
            .map(|file| {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (file.clone(), self.records.get(&name).cloned())
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingRecorder {
    pub transfers: Mutex<Vec<(Origin, TransferMode, PathBuf, MediaRecord)>>,
    pub unknown: Mutex<Vec<(PathBuf, Option<PathBuf>)>>,
}

impl Recorder for RecordingRecorder {
    fn record_transfer(
        &self,
        origin: Origin,
        mode: TransferMode,
        src: &Path,
        _dest_root: &Path,
        record: &MediaRecord,
    ) -> rmt::Result<()> {
        self.transfers
            .lock()
            .push((origin, mode, src.to_path_buf(), record.clone()));
        Ok(())
    }

    fn record_unknown(&self, src: &Path, target_dir: Option<PathBuf>) -> rmt::Result<()> {
        self.unknown.lock().push((src.to_path_buf(), target_dir));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(String, String)>>,
    pub movies: Mutex<Vec<(String, u64, usize)>>,
    pub batches: Mutex<Vec<Vec<BatchEntry>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, text: &str) {
        self.messages
            .lock()
            .push((title.to_string(), text.to_string()));
    }

    fn notify_movie_transferred(
        &self,
        _origin: Origin,
        record: &MediaRecord,
        file_size: u64,
        existing_count: usize,
        _category_enabled: bool,
    ) {
        self.movies
            .lock()
            .push((record.title_string(), file_size, existing_count));
    }

    fn notify_batch_transferred(&self, entries: &[BatchEntry], _origin: Origin) {
        self.batches.lock().push(entries.to_vec());
    }
}

/// Local filesystem that reports a fixed amount of free space
pub struct FixedSpaceFs {
    pub free_bytes: u64,
}

impl FilesystemOps for FixedSpaceFs {
    fn exists(&self, path: &Path) -> bool {
        LocalFs.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        LocalFs.is_dir(path)
    }
    fn is_file(&self, path: &Path) -> bool {
        LocalFs.is_file(path)
    }
    fn size(&self, path: &Path) -> rmt::Result<u64> {
        LocalFs.size(path)
    }
    fn create_dir_all(&self, path: &Path) -> rmt::Result<()> {
        LocalFs.create_dir_all(path)
    }
    fn copy_file(&self, src: &Path, dst: &Path) -> rmt::Result<()> {
        LocalFs.copy_file(src, dst)
    }
    fn hard_link(&self, src: &Path, dst: &Path) -> rmt::Result<()> {
        LocalFs.hard_link(src, dst)
    }
    fn symlink(&self, src: &Path, dst: &Path) -> rmt::Result<()> {
        LocalFs.symlink(src, dst)
    }
    fn remove_file(&self, path: &Path) -> rmt::Result<()> {
        LocalFs.remove_file(path)
    }
    fn remove_dir_all(&self, path: &Path) -> rmt::Result<()> {
        LocalFs.remove_dir_all(path)
    }
    fn copy_dir_all(&self, src: &Path, dst: &Path) -> rmt::Result<()> {
        LocalFs.copy_dir_all(src, dst)
    }
    fn rename(&self, src: &Path, dst: &Path) -> rmt::Result<()> {
        LocalFs.rename(src, dst)
    }
    fn list_dir(&self, dir: &Path) -> rmt::Result<Vec<PathBuf>> {
        LocalFs.list_dir(dir)
    }
    fn walk_files(&self, dir: &Path) -> rmt::Result<Vec<PathBuf>> {
        LocalFs.walk_files(dir)
    }
    fn available_space(&self, _path: &Path) -> Option<u64> {
        Some(self.free_bytes)
    }
}

/// Service plus handles on its recording collaborators
pub struct Harness {
    pub service: TransferService,
    pub recorder: Arc<RecordingRecorder>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(config: Config, resolver: StaticResolver) -> Harness {
    let recorder = Arc::new(RecordingRecorder::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = TransferService::new(
        config,
        Arc::new(resolver),
        recorder.clone(),
        notifier.clone(),
    );
    Harness {
        service,
        recorder,
        notifier,
    }
}

/// Every regular file under `dir`, relative and sorted
pub fn tree(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = LocalFs
        .walk_files(dir)
        .unwrap()
        .into_iter()
        .map(|p| {
            p.strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
