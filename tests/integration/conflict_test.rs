use std::fs;

use super::common::{harness, tree, Library, StaticResolver};
use rmt::{MediaRecord, MediaType, Origin, TransferMode, TransferRequest};

fn heat() -> MediaRecord {
    MediaRecord::new(MediaType::Movie, "Heat").with_year(1995)
}

#[test]
fn test_second_run_is_skipped() {
    let lib = Library::new();
    let input = lib.write("downloads/Heat.1995.mkv", "movie");
    let h = harness(
        lib.config_with_mode(TransferMode::Copy),
        StaticResolver::new().with("Heat.1995.mkv", heat()),
    );
    let request = TransferRequest::new(Origin::Downloader, &input);

    let first = h.service.transfer_media(&request).unwrap();
    assert_eq!(first.transferred, 1);
    let before = tree(&lib.path("movies"));

    let second = h.service.transfer_media(&request).unwrap();
    assert_eq!(second.total, 1);
    assert_eq!(second.skipped, 1);
    assert_eq!(second.transferred, 0);
    assert_eq!(tree(&lib.path("movies")), before);
    // Only the first run is recorded and announced
    assert_eq!(h.recorder.transfers.lock().len(), 1);
    assert_eq!(h.notifier.movies.lock().len(), 1);
}

#[test]
fn test_larger_copy_replaces_existing_version() {
    let lib = Library::new();
    lib.write("movies/Heat (1995)/Heat (1995).mp4", "small");
    let input = lib.write("downloads/Heat.1995.mkv", "a much larger release");
    let h = harness(
        lib.config_with_mode(TransferMode::Copy),
        StaticResolver::new().with("Heat.1995.mkv", heat()),
    );

    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();

    assert_eq!(summary.transferred, 1);
    assert_eq!(tree(&lib.path("movies")), vec!["Heat (1995)/Heat (1995).mkv"]);
    assert_eq!(
        fs::read_to_string(lib.path("movies/Heat (1995)/Heat (1995).mkv")).unwrap(),
        "a much larger release"
    );
    assert_eq!(h.notifier.movies.lock()[0].2, 1);
}

#[test]
fn test_smaller_copy_leaves_existing_version() {
    let lib = Library::new();
    lib.write("movies/Heat (1995)/Heat (1995).mkv", "the existing remux");
    let input = lib.write("downloads/Heat.1995.mkv", "small");
    let h = harness(
        lib.config_with_mode(TransferMode::Copy),
        StaticResolver::new().with("Heat.1995.mkv", heat()),
    );

    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(
        fs::read_to_string(lib.path("movies/Heat (1995)/Heat (1995).mkv")).unwrap(),
        "the existing remux"
    );
    assert!(h.notifier.movies.lock().is_empty());
}

#[test]
fn test_link_mode_never_replaces() {
    let lib = Library::new();
    lib.write("movies/Heat (1995)/Heat (1995).mkv", "old");
    let input = lib.write("downloads/Heat.1995.mkv", "a much larger release");
    let h = harness(
        lib.config_with_mode(TransferMode::HardLink),
        StaticResolver::new().with("Heat.1995.mkv", heat()),
    );

    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(
        fs::read_to_string(lib.path("movies/Heat (1995)/Heat (1995).mkv")).unwrap(),
        "old"
    );
    assert!(h.recorder.transfers.lock().is_empty());
}

#[test]
fn test_hard_link_shares_content() {
    let lib = Library::new();
    let input = lib.write("downloads/Heat.1995.mkv", "movie");
    let h = harness(
        lib.config_with_mode(TransferMode::HardLink),
        StaticResolver::new().with("Heat.1995.mkv", heat()),
    );

    h.service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();

    let placed = lib.path("movies/Heat (1995)/Heat (1995).mkv");
    fs::write(&input, "edited").unwrap();
    assert_eq!(fs::read_to_string(placed).unwrap(), "edited");
}
