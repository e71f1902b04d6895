use std::sync::Arc;

use super::common::{harness, tree, FixedSpaceFs, Library, StaticResolver};
use rmt::{MediaRecord, MediaType, Origin, RmtError, TransferRequest};

#[test]
fn test_low_space_aborts_before_any_transfer() {
    let lib = Library::new();
    let input = lib.write("downloads/Heat.1995.mkv", "movie");

    let mut config = lib.config();
    config.media.min_free_space_gb = 10.0;
    let mut h = harness(
        config,
        StaticResolver::new().with(
            "Heat.1995.mkv",
            MediaRecord::new(MediaType::Movie, "Heat").with_year(1995),
        ),
    );
    h.service = h
        .service
        .with_filesystem(Arc::new(FixedSpaceFs { free_bytes: 0 }));

    let err = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap_err();

    assert!(matches!(err, RmtError::Capacity { .. }));
    assert!(tree(&lib.path("movies")).is_empty());
    assert!(h.recorder.transfers.lock().is_empty());

    let messages = h.notifier.messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "Low disk space");
}

#[test]
fn test_enough_space_transfers() {
    let lib = Library::new();
    let input = lib.write("downloads/Heat.1995.mkv", "movie");

    let mut config = lib.config();
    config.media.min_free_space_gb = 10.0;
    let mut h = harness(
        config,
        StaticResolver::new().with(
            "Heat.1995.mkv",
            MediaRecord::new(MediaType::Movie, "Heat").with_year(1995),
        ),
    );
    h.service = h.service.with_filesystem(Arc::new(FixedSpaceFs {
        free_bytes: 20 * 1024 * 1024 * 1024,
    }));

    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();
    assert_eq!(summary.transferred, 1);
    assert!(h.notifier.messages.lock().is_empty());
}

#[test]
fn test_missing_root_is_destination_error() {
    let lib = Library::new();
    let input = lib.write("downloads/Heat.1995.mkv", "movie");

    let mut config = lib.config();
    config.media.movie_path = Some(lib.path("gone").to_string_lossy().into_owned());
    let h = harness(
        config,
        StaticResolver::new().with("Heat.1995.mkv", MediaRecord::new(MediaType::Movie, "Heat")),
    );

    let err = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap_err();
    assert!(matches!(err, RmtError::Destination(_)));
    assert!(!lib.path("gone").exists());
}
