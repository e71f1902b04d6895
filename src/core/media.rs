//! Media records and the closed tags the engine switches on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of media a file was resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Anime,
    Unknown,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Anime => "anime",
            MediaType::Unknown => "unknown",
        }
    }

    /// Parse a user supplied type name (`movie`, `tv`, `anime`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Some(MediaType::Movie),
            "tv" | "series" | "show" => Some(MediaType::Tv),
            "anime" => Some(MediaType::Anime),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "TV",
            MediaType::Anime => "Anime",
            MediaType::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// How a file reaches the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    HardLink,
    SoftLink,
}

impl TransferMode {
    /// Lenient config parsing: `link` and `softlink` are recognised, anything else copies
    pub fn from_config_value(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "LINK" | "HARDLINK" => TransferMode::HardLink,
            "SOFTLINK" | "SYMLINK" => TransferMode::SoftLink,
            _ => TransferMode::Copy,
        }
    }

    pub fn as_config_value(&self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::HardLink => "link",
            TransferMode::SoftLink => "softlink",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferMode::Copy => "copy",
            TransferMode::HardLink => "hard link",
            TransferMode::SoftLink => "soft link",
        };
        f.write_str(label)
    }
}

impl Serialize for TransferMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_config_value())
    }
}

impl<'de> Deserialize<'de> for TransferMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(TransferMode::from_config_value(&value))
    }
}

/// Where a transfer request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Download client completion hook
    Downloader,
    /// Watched sync folder
    Monitor,
    /// Operator-initiated run
    Manual,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Downloader => "downloader",
            Origin::Monitor => "monitor",
            Origin::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "downloader" | "download" | "pt" => Some(Origin::Downloader),
            "monitor" | "sync" => Some(Origin::Monitor),
            "manual" => Some(Origin::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Origin::Downloader => "Download client",
            Origin::Monitor => "Directory sync",
            Origin::Manual => "Manual",
        };
        f.write_str(label)
    }
}

/// Resolved metadata for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u32>,
    pub category: String,
    pub part: Option<String>,
    pub resource_tag: Option<String>,
    pub seasons: BTreeSet<u32>,
    pub episodes: BTreeSet<u32>,
}

impl MediaRecord {
    pub fn new(media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            media_type,
            title: title.into(),
            year: None,
            category: String::new(),
            part: None,
            resource_tag: None,
            seasons: BTreeSet::new(),
            episodes: BTreeSet::new(),
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = Some(part.into());
        self
    }

    pub fn with_resource_tag(mut self, tag: impl Into<String>) -> Self {
        self.resource_tag = Some(tag.into());
        self
    }

    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = u32>) -> Self {
        self.seasons.extend(seasons);
        self
    }

    pub fn with_episodes(mut self, episodes: impl IntoIterator<Item = u32>) -> Self {
        self.episodes.extend(episodes);
        self
    }

    /// Folder/display key: `title (year)`, or the bare title without a year
    pub fn title_string(&self) -> String {
        title_with_year(&self.title, self.year)
    }

    pub fn first_season(&self) -> Option<u32> {
        self.seasons.iter().next().copied()
    }

    /// `S01` for the first season, empty when no season is known
    pub fn season_item(&self) -> String {
        self.first_season()
            .map(|s| format!("S{:02}", s))
            .unwrap_or_default()
    }

    /// `E05` for one episode, `E05-E07` for several
    pub fn episode_items(&self) -> String {
        match (self.episodes.first(), self.episodes.last()) {
            (Some(first), Some(last)) if first != last => format!("E{:02}-E{:02}", first, last),
            (Some(first), _) => format!("E{:02}", first),
            _ => String::new(),
        }
    }

    /// Episode number or `first-last` range used in the file name
    pub fn episode_range(&self) -> Option<String> {
        match (self.episodes.first(), self.episodes.last()) {
            (Some(first), Some(last)) if first != last => Some(format!("{}-{}", first, last)),
            (Some(first), _) => Some(first.to_string()),
            _ => None,
        }
    }
}

pub fn title_with_year(title: &str, year: Option<u32>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}
