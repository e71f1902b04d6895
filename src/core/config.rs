use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::media::{MediaType, Origin, TransferMode};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "RMT_CONFIG";

const DEFAULT_MEDIA_EXTS: &[&str] = &[
    ".mp4", ".mkv", ".ts", ".iso", ".rmvb", ".avi", ".mov", ".mpeg", ".mpg", ".wmv", ".3gp",
    ".asf",
];
const DEFAULT_SUBTITLE_EXTS: &[&str] = &[".srt", ".ass", ".ssa"];
const DEFAULT_FAVORITE_DIR: &str = "精选";
const DEFAULT_CATEGORY: &str = "Uncategorized";
const DEFAULT_MIN_FREE_GB: f64 = 10.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub transfer: TransferModes,
    #[serde(default)]
    pub sync: SyncConfig,
    /// SQLite file for transfer history (defaults next to the config file)
    #[serde(default)]
    pub history_db: Option<String>,
}

/// Library roots and placement policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub movie_path: Option<String>,
    #[serde(default)]
    pub tv_path: Option<String>,
    #[serde(default)]
    pub anime_path: Option<String>,
    #[serde(default)]
    pub unknown_path: Option<String>,
    #[serde(default)]
    pub movie_category: bool,
    #[serde(default)]
    pub tv_category: bool,
    #[serde(default)]
    pub anime_category: bool,
    #[serde(default = "default_favorite_dir")]
    pub favorite_dir: String,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_min_free_gb")]
    pub min_free_space_gb: f64,
    #[serde(default = "default_media_exts")]
    pub media_exts: Vec<String>,
    #[serde(default = "default_subtitle_exts")]
    pub subtitle_exts: Vec<String>,
}

/// Transfer mode per request origin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferModes {
    #[serde(default)]
    pub downloader: TransferMode,
    #[serde(default)]
    pub sync: TransferMode,
    /// Falls back to `sync` when unset
    #[serde(default)]
    pub manual: Option<TransferMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Each entry is `source` or `source|target`
    #[serde(default)]
    pub paths: Vec<String>,
}

/// One configured sync root, split from its `source|target` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRoot {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
}

fn default_favorite_dir() -> String {
    DEFAULT_FAVORITE_DIR.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_min_free_gb() -> f64 {
    DEFAULT_MIN_FREE_GB
}

fn default_media_exts() -> Vec<String> {
    DEFAULT_MEDIA_EXTS.iter().map(|s| s.to_string()).collect()
}

fn default_subtitle_exts() -> Vec<String> {
    DEFAULT_SUBTITLE_EXTS.iter().map(|s| s.to_string()).collect()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            movie_path: None,
            tv_path: None,
            anime_path: None,
            unknown_path: None,
            movie_category: false,
            tv_category: false,
            anime_category: false,
            favorite_dir: default_favorite_dir(),
            default_category: default_category(),
            min_free_space_gb: default_min_free_gb(),
            media_exts: default_media_exts(),
            subtitle_exts: default_subtitle_exts(),
        }
    }
}

impl MediaConfig {
    /// Configured library root for a media type
    pub fn root_for(&self, media_type: MediaType) -> Option<PathBuf> {
        let root = match media_type {
            MediaType::Movie => self.movie_path.as_ref(),
            MediaType::Tv => self.tv_path.as_ref(),
            MediaType::Anime => self.anime_path.as_ref(),
            MediaType::Unknown => self.unknown_path.as_ref(),
        };
        root.filter(|p| !p.trim().is_empty()).map(PathBuf::from)
    }

    pub fn category_enabled(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Movie => self.movie_category,
            MediaType::Tv => self.tv_category,
            MediaType::Anime => self.anime_category,
            MediaType::Unknown => false,
        }
    }

    /// Every configured top-level root, unknown root included
    pub fn library_roots(&self) -> Vec<PathBuf> {
        [
            MediaType::Movie,
            MediaType::Tv,
            MediaType::Anime,
            MediaType::Unknown,
        ]
        .into_iter()
        .filter_map(|t| self.root_for(t))
        .collect()
    }

    pub fn is_media_ext(&self, path: &Path) -> bool {
        has_ext_in(path, &self.media_exts)
    }

    pub fn is_subtitle_ext(&self, path: &Path) -> bool {
        has_ext_in(path, &self.subtitle_exts)
    }
}

/// Case-insensitive match of a path's extension against `.ext` entries
pub fn has_ext_in(path: &Path, exts: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let dotted = format!(".{}", ext.to_lowercase());
    exts.iter().any(|e| e.to_lowercase() == dotted)
}

impl TransferModes {
    pub fn for_origin(&self, origin: Origin) -> TransferMode {
        match origin {
            Origin::Downloader => self.downloader,
            Origin::Monitor => self.sync,
            Origin::Manual => self.manual.unwrap_or(self.sync),
        }
    }
}

impl SyncConfig {
    pub fn roots(&self) -> Vec<SyncRoot> {
        self.paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('|') {
                Some((source, target)) => SyncRoot {
                    source: PathBuf::from(source.trim()),
                    target: Some(target.trim())
                        .filter(|t| !t.is_empty())
                        .map(PathBuf::from),
                },
                None => SyncRoot {
                    source: PathBuf::from(p),
                    target: None,
                },
            })
            .collect()
    }
}

impl Config {
    /// Load from `RMT_CONFIG` or the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("Config file {:?} not found, using defaults", config_path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("rmt").join("config.json"))
    }

    /// History database location: explicit setting, else beside the config file
    pub fn history_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.history_db.as_ref().filter(|p| !p.trim().is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let config_path = Self::get_config_path()?;
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(dir.join("history.db"))
    }

    pub fn transfer_mode(&self, origin: Origin) -> TransferMode {
        self.transfer.for_origin(origin)
    }
}
