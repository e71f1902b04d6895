use super::common::{harness, tree, Library, StaticResolver};
use rmt::{Origin, TransferRequest};

#[test]
fn test_unidentified_file_goes_to_unknown_root() {
    let lib = Library::new();
    let input = lib.write("downloads/Mystery/clip.mkv", "???");
    let h = harness(lib.config(), StaticResolver::new());

    let summary = h
        .service
        .transfer_media(&TransferRequest::new(Origin::Downloader, &input))
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(tree(&lib.path("unknown")), vec![".unknown/Mystery/clip.mkv"]);

    let unknown = h.recorder.unknown.lock();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0], (input.clone(), None));
    assert!(h.recorder.transfers.lock().is_empty());
}

#[test]
fn test_unidentified_file_uses_explicit_target() {
    let lib = Library::new();
    let input = lib.write("downloads/Mystery/clip.mkv", "???");
    let target = lib.path("elsewhere");
    std::fs::create_dir_all(&target).unwrap();
    let h = harness(lib.config(), StaticResolver::new());

    h.service
        .transfer_media(
            &TransferRequest::new(Origin::Manual, &input).with_target_dir(Some(target.clone())),
        )
        .unwrap();

    assert_eq!(tree(&target), vec![".unknown/Mystery/clip.mkv"]);
    assert!(tree(&lib.path("unknown")).is_empty());
    assert_eq!(h.recorder.unknown.lock()[0].1, Some(target));
}

#[test]
fn test_existing_unknown_segment_is_not_doubled() {
    let lib = Library::new();
    let input = lib.write("downloads/Mystery/clip.mkv", "???");
    let target = lib.path("unknown/.unknown");
    std::fs::create_dir_all(&target).unwrap();
    let h = harness(lib.config(), StaticResolver::new());

    h.service
        .transfer_media(&TransferRequest::new(Origin::Manual, &input).with_target_dir(Some(target)))
        .unwrap();

    assert_eq!(tree(&lib.path("unknown")), vec![".unknown/Mystery/clip.mkv"]);
}
