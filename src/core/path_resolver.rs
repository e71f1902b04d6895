//! Destination layout for movies, TV and anime.
//!
//! Movies land in `root/[favorites|category/]Title (Year)/Title (Year)[-part][ - res].ext`.
//! Episodes land in `root/[category/]Title (Year)/Season N/Title[-part] - S01E02 - 第 2 集.ext`.

use std::path::{Path, PathBuf};

use super::config::MediaConfig;
use super::media::{title_with_year, MediaRecord, MediaType};
use crate::error::{Result, RmtError};
use crate::platform::FilesystemOps;

/// Computed destination for one record, before any existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Directory that holds the file (title folder for movies, season folder for episodes)
    pub dir: PathBuf,
    /// Full destination path without extension
    pub stem: PathBuf,
}

pub struct PathResolver<'a> {
    media: &'a MediaConfig,
    fs: &'a dyn FilesystemOps,
}

impl<'a> PathResolver<'a> {
    pub fn new(media: &'a MediaConfig, fs: &'a dyn FilesystemOps) -> Self {
        Self { media, fs }
    }

    pub fn resolve(&self, root: &Path, record: &MediaRecord) -> Result<Placement> {
        match record.media_type {
            MediaType::Movie => Ok(self.movie(root, record)),
            MediaType::Tv | MediaType::Anime => self.episode(root, record),
            MediaType::Unknown => Err(RmtError::metadata(format!(
                "{} has no media type",
                record.title_string()
            ))),
        }
    }

    fn movie(&self, root: &Path, record: &MediaRecord) -> Placement {
        let title_string = record.title_string();

        let dir = if self.media.category_enabled(MediaType::Movie) {
            // An existing favorites copy wins over the category folder
            [self.media.favorite_dir.as_str(), record.category.as_str()]
                .into_iter()
                .map(|parent| root.join(parent).join(&title_string))
                .find(|candidate| self.fs.exists(candidate))
                .unwrap_or_else(|| root.join(&record.category).join(&title_string))
        } else {
            root.join(&title_string)
        };

        let stem = dir.join(movie_file_stem(record));
        Placement { dir, stem }
    }

    fn episode(&self, root: &Path, record: &MediaRecord) -> Result<Placement> {
        let title_string = record.title_string();
        let media_path = if self.media.category_enabled(record.media_type) {
            root.join(&record.category).join(&title_string)
        } else {
            root.join(&title_string)
        };

        // Only the first season decides the folder
        let season = record.first_season().ok_or_else(|| {
            RmtError::metadata(format!("{} has no season information", title_string))
        })?;
        let dir = media_path.join(format!("Season {}", season));

        let range = record.episode_range().ok_or_else(|| {
            RmtError::metadata(format!("{} has no episode information", title_string))
        })?;

        let mut name = record.title.clone();
        if let Some(part) = &record.part {
            name = format!("{}-{}", name, part);
        }
        let name = format!(
            "{} - {}{} - 第 {} 集",
            name,
            record.season_item(),
            record.episode_items(),
            range
        );

        let stem = dir.join(name);
        Ok(Placement { dir, stem })
    }
}

/// `Title (Year)[-part][ - resource]`
pub fn movie_file_stem(record: &MediaRecord) -> String {
    let mut stem = record.title_string();
    if let Some(part) = &record.part {
        stem = format!("{}-{}", stem, part);
    }
    if let Some(tag) = &record.resource_tag {
        stem = format!("{} - {}", stem, tag);
    }
    stem
}

/// Append `.ext` (given with or without the dot) to an extensionless path
pub fn with_ext(stem: &Path, ext: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_os_string();
    if !ext.is_empty() && !ext.starts_with('.') {
        path.push(".");
    }
    path.push(ext);
    PathBuf::from(path)
}

/// Prospective library path for a title without touching the filesystem
///
/// `season_label` accepts `S01`, `s1` or `1`; an unparsable label leaves the
/// season folder out.
pub fn resolve_destination_path(
    media: &MediaConfig,
    root: &Path,
    media_type: MediaType,
    title: &str,
    year: Option<u32>,
    category: Option<&str>,
    season_label: Option<&str>,
) -> Option<PathBuf> {
    if title.trim().is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    if media.category_enabled(media_type) {
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            path.push(category);
        }
    }
    path.push(title_with_year(title, year));

    match media_type {
        MediaType::Movie => {}
        MediaType::Tv | MediaType::Anime => {
            if let Some(season) = season_label.and_then(parse_season_label) {
                path.push(format!("Season {}", season));
            }
        }
        MediaType::Unknown => return None,
    }

    Some(path)
}

fn parse_season_label(label: &str) -> Option<u32> {
    label
        .trim()
        .trim_start_matches(&['S', 's'][..])
        .parse::<u32>()
        .ok()
}
