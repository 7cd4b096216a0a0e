use std::fs;
use std::path::Path;
use tmf_reorg_core::{
    EventRelocator, MatchPolicy, RelocationOutcome, RelocationPhase, ReorgConfig, ReorgError,
};

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{}").unwrap();
}

fn setup() -> (tempfile::TempDir, ReorgConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = ReorgConfig::new(
        dir.path().join("old"),
        dir.path().join("new"),
        dir.path().join("conformance"),
    );
    (dir, config)
}

#[test]
fn longest_leading_words_match_wins() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Resource/ResourceCreate.schema.json"));
    touch(&config.old_root.join("schemas/Resource/Resource.schema.json"));

    let relocator = EventRelocator::new(&config);
    let found = relocator
        .find_best_match("ResourceCreateEvent.schema.json")
        .unwrap()
        .expect("a prefix should match");
    assert_eq!(found.name, "ResourceCreate");
    assert_eq!(found.words_used, 2);
    assert_eq!(
        found.matched_file,
        config.old_root.join("schemas/Resource/ResourceCreate.schema.json")
    );
}

#[test]
fn full_name_is_tried_before_shorter_prefixes() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Common/ResourceCreateEvent.schema.json"));
    touch(&config.old_root.join("schemas/Resource/Resource.schema.json"));

    let found = EventRelocator::new(&config)
        .find_best_match("ResourceCreateEvent.schema.json")
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "ResourceCreateEvent");
    assert_eq!(found.words_used, 3);
}

#[test]
fn end_to_end_moves_payload_into_mirrored_event_folder() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Foo/Bar.schema.json"));
    let original = config.new_root.join("schemas/Tmf/schemas/BarEvent.schema.json");
    touch(&original);

    let report = EventRelocator::new(&config).run().unwrap();

    let expected = config.new_root.join("schemas/Tmf/Foo/Event/BarEvent.schema.json");
    assert!(expected.is_file());
    assert!(!original.exists());
    assert_eq!(report.moved(), 1);
    assert_eq!(report.entries[0].phase, RelocationPhase::PayloadSchemas);
    assert_eq!(
        report.entries[0].outcome,
        RelocationOutcome::Moved {
            from: original,
            to: expected
        }
    );
}

#[test]
fn event_folder_files_are_relocated_first() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Party/PartyRole.schema.json"));
    let event_file = config
        .new_root
        .join("schemas/Tmf/schemas/Event/PartyRoleCreateEvent.schema.json");
    let payload_file = config
        .new_root
        .join("schemas/Tmf/schemas/PartyRoleCreateEventPayload.schema.json");
    touch(&event_file);
    touch(&payload_file);

    let report = EventRelocator::new(&config).run().unwrap();

    let folder = config.new_root.join("schemas/Tmf/Party/Event");
    assert!(folder.join("PartyRoleCreateEvent.schema.json").is_file());
    assert!(folder.join("PartyRoleCreateEventPayload.schema.json").is_file());
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].phase, RelocationPhase::EventSchemas);
    assert_eq!(report.entries[1].phase, RelocationPhase::PayloadSchemas);
}

#[test]
fn unmatched_file_stays_in_place_without_error() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Foo/Bar.schema.json"));
    let original = config.new_root.join("schemas/Tmf/schemas/QuxEvent.schema.json");
    touch(&original);

    let report = EventRelocator::new(&config).run().unwrap();

    assert!(original.is_file());
    assert_eq!(report.unmatched(), 1);
    assert_eq!(report.moved(), 0);
    assert!(!config.new_root.join("schemas/Tmf/Foo").exists());
}

#[test]
fn dry_run_reports_moves_without_touching_files() {
    let (_dir, mut config) = setup();
    config.dry_run = true;
    touch(&config.old_root.join("schemas/Foo/Bar.schema.json"));
    let original = config.new_root.join("schemas/Tmf/schemas/BarEvent.schema.json");
    touch(&original);

    let report = EventRelocator::new(&config).run().unwrap();

    assert_eq!(report.planned(), 1);
    assert!(original.is_file());
    assert!(!config.new_root.join("schemas/Tmf/Foo").exists());
}

#[test]
fn first_match_policy_picks_sorted_first_category() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Zeta/Bar.schema.json"));
    touch(&config.old_root.join("schemas/Alpha/Bar.schema.json"));

    let found = EventRelocator::new(&config)
        .find_best_match("BarEvent.schema.json")
        .unwrap()
        .unwrap();
    assert_eq!(
        found.matched_file,
        config.old_root.join("schemas/Alpha/Bar.schema.json")
    );
}

#[test]
fn require_unique_policy_rejects_ambiguous_match() {
    let (_dir, mut config) = setup();
    config.match_policy = MatchPolicy::RequireUnique;
    touch(&config.old_root.join("schemas/Zeta/Bar.schema.json"));
    touch(&config.old_root.join("schemas/Alpha/Bar.schema.json"));

    let err = EventRelocator::new(&config)
        .find_best_match("BarEvent.schema.json")
        .unwrap_err();
    match err {
        ReorgError::Ambiguous { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn name_without_words_is_left_unmatched() {
    let (_dir, config) = setup();
    touch(&config.old_root.join("schemas/Foo/Bar.schema.json"));
    let original = config.new_root.join("schemas/Tmf/schemas/1234.schema.json");
    touch(&original);

    let report = EventRelocator::new(&config).run().unwrap();

    assert!(original.is_file());
    assert_eq!(report.unmatched(), 1);
    assert_eq!(report.moved(), 0);
    assert_eq!(
        report.entries[0].outcome,
        RelocationOutcome::Unmatched { path: original }
    );
}
