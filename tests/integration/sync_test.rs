use super::common::{harness, tree, Library, StaticResolver};
use rmt::{MediaRecord, MediaType, RmtError};

fn resolver() -> StaticResolver {
    StaticResolver::new()
        .with(
            "Heat.1995.mkv",
            MediaRecord::new(MediaType::Movie, "Heat").with_year(1995),
        )
        .with(
            "Show.S01E01.mkv",
            MediaRecord::new(MediaType::Tv, "Show")
                .with_seasons([1])
                .with_episodes([1]),
        )
}

fn populate(lib: &Library) {
    lib.write("downloads/Heat.1995.mkv", "movie");
    lib.write("downloads/Show.S01/Show.S01E01.mkv", "episode");
    lib.write("downloads/notes.txt", "ignored");
    lib.write("downloads/.partial/Other.mkv", "ignored");
}

#[test]
fn test_manual_transfer_of_every_entry() {
    let lib = Library::new();
    populate(&lib);
    let h = harness(lib.config(), resolver());

    let outcomes = h
        .service
        .transfer_manually(&lib.path("downloads"), None)
        .unwrap();

    let names: Vec<String> = outcomes
        .iter()
        .map(|o| o.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Heat.1995.mkv", "Show.S01"]);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    assert_eq!(tree(&lib.path("movies")), vec!["Heat (1995)/Heat (1995).mkv"]);
    assert_eq!(
        tree(&lib.path("tv")),
        vec!["Show/Season 1/Show - S01E01 - 第 1 集.mkv"]
    );
}

#[test]
fn test_manual_transfer_into_target() {
    let lib = Library::new();
    populate(&lib);
    let target = lib.path("elsewhere");
    std::fs::create_dir_all(&target).unwrap();
    let h = harness(lib.config(), resolver());

    h.service
        .transfer_manually(&lib.path("downloads"), Some(&target))
        .unwrap();

    assert_eq!(
        tree(&target),
        vec![
            "Heat (1995)/Heat (1995).mkv",
            "Show/Season 1/Show - S01E01 - 第 1 集.mkv",
        ]
    );
}

#[test]
fn test_manual_transfer_rejects_missing_paths() {
    let lib = Library::new();
    let h = harness(lib.config(), resolver());

    let err = h
        .service
        .transfer_manually(&lib.path("nope"), None)
        .unwrap_err();
    assert!(matches!(err, RmtError::Input(_)));

    let err = h
        .service
        .transfer_manually(&lib.path("downloads"), Some(&lib.path("nope")))
        .unwrap_err();
    assert!(matches!(err, RmtError::Destination(_)));
}

#[test]
fn test_sync_roots_with_target() {
    let lib = Library::new();
    populate(&lib);
    let target = lib.path("synced");
    std::fs::create_dir_all(&target).unwrap();

    let mut config = lib.config();
    config.sync.paths = vec![
        format!("{}|{}", lib.path("downloads").display(), target.display()),
        lib.path("missing").display().to_string(),
    ];
    let h = harness(config, resolver());

    let outcomes = h.service.transfer_all_sync();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    assert_eq!(tree(&target).len(), 2);
    assert!(tree(&lib.path("movies")).is_empty());
    assert!(h
        .recorder
        .transfers
        .lock()
        .iter()
        .all(|(origin, ..)| *origin == rmt::Origin::Monitor));
}
