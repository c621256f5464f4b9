//! Integration tests: the store against real files in a temp directory.

use pretty_assertions::assert_eq;
use rdc_core::DEFAULT_NOTES;
use rdc_store::*;
use tempfile::TempDir;

fn fields(die_cut: &str, notes: &str) -> PresetFields {
    PresetFields {
        die_cut: die_cut.into(),
        notes: notes.into(),
        ..PresetFields::default()
    }
}

#[test]
fn open_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("rotary.json");

    let store = Store::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
    assert_eq!(store.scratch_notes(), DEFAULT_NOTES);
    assert!(store.presets().is_empty());
}

#[test]
fn mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rotary.json");

    {
        let mut store = Store::open(&path).unwrap();
        store.create(fields("3698", "first")).unwrap();
        store.create(fields("5065", "second")).unwrap();
        store
            .update(
                2,
                PresetFields {
                    scissor_lift: true,
                    ..fields("5065", "second, edited")
                },
            )
            .unwrap();
        store.record_access_at(2, 1_700_000_000).unwrap();
        store.delete(1).unwrap();
        store.save_scratch_notes(r#"[{"text":"shift B"}]"#).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let preset = store.get(2).unwrap();
    assert_eq!(preset.notes, "second, edited");
    assert!(preset.scissor_lift);
    assert_eq!(preset.last_accessed, Some(1_700_000_000));
    assert_eq!(preset.accessed_count, 1);
    assert!(store.get(1).is_err());
    assert_eq!(store.scratch_notes(), r#"[{"text":"shift B"}]"#);
    assert_eq!(store.database().next_id, 3);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rotary.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Store::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn legacy_file_loads_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rotary.json");
    std::fs::write(&path, include_str!("fixtures/legacy_v0.json")).unwrap();

    let mut store = Store::open(&path).unwrap();
    assert_eq!(store.database().version, SCHEMA_VERSION);
    assert_eq!(store.scratch_notes(), DEFAULT_NOTES);

    let preset = store.get(4).unwrap();
    assert_eq!(preset.pull_roll, Some(74.0));
    assert!(!preset.skip_feed);
    assert_eq!(preset.last_accessed, None);

    assert_eq!(store.create(fields("new", "")).unwrap().id, 5);

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\"version\": 1"), "upgrade not written:\n{saved}");
}

#[test]
fn search_covers_notes_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rotary.json");
    std::fs::write(&path, include_str!("fixtures/legacy_v0.json")).unwrap();
    let store = Store::open(&path).unwrap();

    let ids = |query: &str| store.search(query).iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids("great lakes"), vec![4]);
    assert_eq!(ids("SNUB"), vec![4]);
    assert_eq!(ids("263"), vec![1]);
    assert_eq!(ids("6"), vec![1, 4]);
    // belt speed is not searched
    assert!(ids("143").is_empty());
}

#[test]
fn export_then_import_replaces_database() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("backup.json");

    let mut source = Store::open(dir.path().join("a.json")).unwrap();
    source.create(fields("3698", "kept")).unwrap();
    source.save_scratch_notes(r#"[{"newline":2}]"#).unwrap();
    source.export_to(&backup).unwrap();

    let mut target = Store::open(dir.path().join("b.json")).unwrap();
    target.create(fields("gone", "")).unwrap();
    target.create(fields("gone too", "")).unwrap();
    target.import_from(&backup).unwrap();

    assert_eq!(target.database(), source.database());

    let reopened = Store::open(dir.path().join("b.json")).unwrap();
    assert_eq!(reopened.presets().len(), 1);
    assert_eq!(reopened.get(1).unwrap().notes, "kept");
}

#[test]
fn import_with_bad_notes_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"version":1,"presets":[],"scratch_notes":"[{\"text\":\"x\",\"color\":\"puce\"}]"}"#)
        .unwrap();

    let mut store = Store::open(dir.path().join("rotary.json")).unwrap();
    store.create(fields("3698", "")).unwrap();

    let err = store.import_from(&bad).unwrap_err();
    assert!(matches!(err, StoreError::InvalidNotes(_)), "got {err:?}");
    assert_eq!(store.presets().len(), 1);

    let missing = store.import_from(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, StoreError::Io { .. }));
}

#[test]
fn duplicate_ids_make_a_file_corrupt() {
    let dir = TempDir::new().unwrap();
    let dup = dir.path().join("dup.json");
    std::fs::write(&dup, r#"{"version":1,"presets":[{"id":3,"die_cut":"a"},{"id":3,"die_cut":"b"}]}"#).unwrap();

    let mut store = Store::open(dir.path().join("rotary.json")).unwrap();
    store.create(fields("3698", "")).unwrap();
    let err = store.import_from(&dup).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    assert_eq!(store.presets().len(), 1);

    let err = Store::open(&dup).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
}

#[test]
fn failed_write_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    let path = data.join("rotary.json");

    let mut store = Store::open(&path).unwrap();
    store.create(fields("3698", "")).unwrap();
    let before = store.database().clone();

    // the database directory turns into a plain file, so every write fails
    std::fs::remove_dir_all(&data).unwrap();
    std::fs::write(&data, "not a directory").unwrap();

    let err = store.create(fields("5065", "")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
    assert!(matches!(store.update(1, fields("x", "")), Err(StoreError::Io { .. })));
    assert!(matches!(store.delete(1), Err(StoreError::Io { .. })));
    assert!(matches!(store.record_access(1), Err(StoreError::Io { .. })));
    assert!(matches!(store.save_scratch_notes("[]"), Err(StoreError::Io { .. })));
    assert_eq!(store.database(), &before);
}
