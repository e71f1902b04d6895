//! Offline resolver that reads title, year and episode numbers from file names.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::collaborators::{ResolveHint, Resolver};
use crate::core::media::{MediaRecord, MediaType};
use crate::error::Result;

static GROUP_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\[[^\]]*\]\s*)+").expect("valid group regex"));
static SEASON_EPISODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})E(\d{1,3})(?:(?:-E?|E)(\d{1,3}))?\b").expect("valid episode regex")
});
static SEASON_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})\b").expect("valid season regex"));
static EPISODE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bEP?(\d{1,3})\b").expect("valid episode regex"));
/// `Title - 05 [...]` as used by fansub groups
static DASH_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-\s(\d{1,3})(?:v\d)?(?:\s|$)").expect("valid dash regex"));
static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid year regex"));
static RESOLUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160p|1080p|720p|480p|4K)\b").expect("valid resolution regex"));
static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(CD\s?\d|Part\s?\d|Disc\s?\d)\b").expect("valid part regex"));
static SEASON_FOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Season\s*(\d{1,2})$").expect("valid folder regex"));

/// What a single name yields before hints are applied
#[derive(Debug, Default)]
struct ParsedName {
    title: String,
    year: Option<u32>,
    resource_tag: Option<String>,
    part: Option<String>,
    seasons: BTreeSet<u32>,
    episodes: BTreeSet<u32>,
    has_group: bool,
}

pub struct FilenameResolver {
    default_category: String,
}

impl FilenameResolver {
    pub fn new(default_category: impl Into<String>) -> Self {
        Self {
            default_category: default_category.into(),
        }
    }

    fn resolve_one(&self, path: &Path, hint: &ResolveHint) -> Option<MediaRecord> {
        let name = if path.is_dir() {
            path.file_name()
        } else {
            path.file_stem()
        }?
        .to_string_lossy()
        .into_owned();

        let mut parsed = parse_name(&name);

        let parent = path.parent();
        let season_folder = parent
            .and_then(|p| p.file_name())
            .and_then(|n| SEASON_FOLDER.captures(&n.to_string_lossy()).and_then(|c| c[1].parse::<u32>().ok()));
        if let Some(season) = season_folder {
            if parsed.seasons.is_empty() {
                parsed.seasons.insert(season);
            }
            if parsed.title.is_empty() {
                if let Some(show) = parent.and_then(Path::parent).and_then(Path::file_name) {
                    let show = parse_name(&show.to_string_lossy());
                    parsed.title = show.title;
                    parsed.year = parsed.year.or(show.year);
                }
            }
        }

        if !parsed.episodes.is_empty() && parsed.seasons.is_empty() {
            parsed.seasons.insert(1);
        }

        let mut media_type = if !parsed.episodes.is_empty() && parsed.has_group {
            MediaType::Anime
        } else if !parsed.episodes.is_empty() || !parsed.seasons.is_empty() {
            MediaType::Tv
        } else {
            MediaType::Movie
        };

        let mut title = parsed.title;
        let mut year = parsed.year;
        let mut category = String::new();

        if let Some(seed) = &hint.record {
            if !seed.title.trim().is_empty() {
                title = seed.title.clone();
            }
            year = seed.year.or(year);
            category = seed.category.clone();
            if seed.media_type != MediaType::Unknown {
                media_type = seed.media_type;
            }
            if parsed.seasons.is_empty() {
                parsed.seasons = seed.seasons.clone();
            }
            if parsed.episodes.is_empty() {
                parsed.episodes = seed.episodes.clone();
            }
        }
        if let Some(forced) = hint.media_type {
            media_type = forced;
        }

        if title.is_empty() {
            log::debug!("No title recognised in {:?}", path);
            return None;
        }
        if category.is_empty() {
            category = self.default_category.clone();
        }

        let mut record = MediaRecord::new(media_type, title)
            .with_category(category)
            .with_seasons(parsed.seasons)
            .with_episodes(parsed.episodes);
        record.year = year;
        record.part = parsed.part;
        record.resource_tag = parsed.resource_tag;
        Some(record)
    }
}

impl Resolver for FilenameResolver {
    fn resolve(
        &self,
        files: &[PathBuf],
        hint: &ResolveHint,
    ) -> Result<HashMap<PathBuf, Option<MediaRecord>>> {
        Ok(files
            .iter()
            .map(|file| (file.clone(), self.resolve_one(file, hint)))
            .collect())
    }
}

fn parse_name(raw: &str) -> ParsedName {
    let mut parsed = ParsedName::default();

    let name = match GROUP_TAGS.find(raw) {
        Some(tags) => {
            parsed.has_group = true;
            &raw[tags.end()..]
        }
        None => raw,
    };

    // The title runs up to the first recognised marker
    let mut title_end = name.len();

    if let Some(caps) = SEASON_EPISODE.captures(name) {
        title_end = title_end.min(caps.get(0).map_or(name.len(), |m| m.start()));
        let season = caps[1].parse().unwrap_or(1);
        let first: u32 = caps[2].parse().unwrap_or(0);
        let last: u32 = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(first);
        parsed.seasons.insert(season);
        parsed.episodes.extend(first..=last.max(first));
    } else if let Some(caps) = DASH_EPISODE.captures(name) {
        title_end = title_end.min(caps.get(0).map_or(name.len(), |m| m.start()));
        if let Ok(episode) = caps[1].parse() {
            parsed.episodes.insert(episode);
        }
    } else {
        if let Some(caps) = SEASON_ONLY.captures(name) {
            title_end = title_end.min(caps.get(0).map_or(name.len(), |m| m.start()));
            if let Ok(season) = caps[1].parse() {
                parsed.seasons.insert(season);
            }
        }
        if let Some(caps) = EPISODE_ONLY.captures(name) {
            title_end = title_end.min(caps.get(0).map_or(name.len(), |m| m.start()));
            if let Ok(episode) = caps[1].parse() {
                parsed.episodes.insert(episode);
            }
        }
    }

    if let Some(m) = YEAR.find(name) {
        title_end = title_end.min(m.start());
        parsed.year = m.as_str().parse().ok();
    }
    if let Some(m) = RESOLUTION.find(name) {
        title_end = title_end.min(m.start());
        parsed.resource_tag = Some(m.as_str().to_string());
    }
    if let Some(m) = PART.find(name) {
        title_end = title_end.min(m.start());
        parsed.part = Some(m.as_str().replace(' ', ""));
    }

    parsed.title = clean_title(&name[..title_end]);
    parsed
}

fn clean_title(raw: &str) -> String {
    let spaced = raw.replace(&['.', '_'][..], " ");
    let trimmed = spaced.trim_end_matches(|c: char| c.is_whitespace() || "([-".contains(c));
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
