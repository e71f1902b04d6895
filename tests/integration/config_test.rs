use std::fs;
use std::path::PathBuf;

use rmt::core::config::SyncRoot;
use rmt::{Config, MediaType, Origin, TransferMode};

fn scratch() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("rmt-config").tempdir().unwrap()
}

#[test]
fn test_load_from_json() {
    let dir = scratch();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "media": {
                "movie_path": "/lib/movies",
                "tv_path": "/lib/tv",
                "movie_category": true,
                "min_free_space_gb": 2.5
            },
            "transfer": { "downloader": "link", "sync": "softlink" },
            "sync": { "paths": ["/dl|/lib/inbox", "/watch"] }
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(
        config.media.root_for(MediaType::Movie),
        Some(PathBuf::from("/lib/movies"))
    );
    assert_eq!(config.media.root_for(MediaType::Anime), None);
    assert!(config.media.category_enabled(MediaType::Movie));
    assert!(!config.media.category_enabled(MediaType::Tv));
    assert_eq!(config.media.min_free_space_gb, 2.5);
    assert_eq!(config.media.favorite_dir, "精选");

    assert_eq!(config.transfer_mode(Origin::Downloader), TransferMode::HardLink);
    assert_eq!(config.transfer_mode(Origin::Monitor), TransferMode::SoftLink);
    assert_eq!(config.transfer_mode(Origin::Manual), TransferMode::SoftLink);

    assert_eq!(
        config.sync.roots(),
        vec![
            SyncRoot {
                source: PathBuf::from("/dl"),
                target: Some(PathBuf::from("/lib/inbox")),
            },
            SyncRoot {
                source: PathBuf::from("/watch"),
                target: None,
            },
        ]
    );
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = scratch();
    let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config.media.min_free_space_gb, 10.0);
    assert!(config.media.library_roots().is_empty());
}

#[test]
fn test_invalid_json_is_an_error() {
    let dir = scratch();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_save_then_load() {
    let dir = scratch();
    let path = dir.path().join("nested/config.json");

    let mut config = Config::default();
    config.media.tv_path = Some("/lib/tv".to_string());
    config.transfer.manual = Some(TransferMode::HardLink);
    config.history_db = Some("/var/lib/rmt/history.db".to_string());
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.media.tv_path.as_deref(), Some("/lib/tv"));
    assert_eq!(loaded.transfer_mode(Origin::Manual), TransferMode::HardLink);
    assert_eq!(
        loaded.history_db_path().unwrap(),
        PathBuf::from("/var/lib/rmt/history.db")
    );
}
