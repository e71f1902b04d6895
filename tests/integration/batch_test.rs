use super::common::{harness, tree, Library, StaticResolver};
use rmt::{MediaRecord, MediaType, Origin, TransferRequest};

fn episode(n: u32) -> MediaRecord {
    MediaRecord::new(MediaType::Tv, "Show")
        .with_seasons([1])
        .with_episodes([n])
}

#[test]
fn test_episodes_share_one_notification() {
    let lib = Library::new();
    lib.write("downloads/Show.S01/Show.S01E01.mkv", "aaaa");
    lib.write("downloads/Show.S01/Show.S01E02.mkv", "bbbbbb");

    let h = harness(
        lib.config(),
        StaticResolver::new()
            .with("Show.S01E01.mkv", episode(1))
            .with("Show.S01E02.mkv", episode(2)),
    );
    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Monitor, lib.path("downloads/Show.S01")))
        .unwrap();

    assert_eq!(summary.transferred, 2);
    assert_eq!(
        tree(&lib.path("tv")),
        vec![
            "Show/Season 1/Show - S01E01 - 第 1 集.mkv",
            "Show/Season 1/Show - S01E02 - 第 2 集.mkv",
        ]
    );

    let batches = h.notifier.batches.lock();
    assert_eq!(batches.len(), 1);
    let entries = &batches[0];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title_string, "Show");
    assert_eq!(entries[0].total_size, 10);
    assert_eq!(entries[0].episodes.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert!(h.notifier.movies.lock().is_empty());
    assert_eq!(h.recorder.transfers.lock().len(), 2);
}

#[test]
fn test_skipped_episodes_are_not_announced() {
    let lib = Library::new();
    lib.write("downloads/Show.S01/Show.S01E01.mkv", "aaaa");
    lib.write("tv/Show/Season 1/Show - S01E01 - 第 1 集.mkv", "aaaa");

    let h = harness(
        lib.config(),
        StaticResolver::new().with("Show.S01E01.mkv", episode(1)),
    );
    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Monitor, lib.path("downloads/Show.S01")))
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(h.notifier.batches.lock().is_empty());
}
