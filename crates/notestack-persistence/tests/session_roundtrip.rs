use chrono::{TimeZone, Utc};
use notestack_core::{AppConfig, Clock, ManualClock};
use notestack_domain::session::{COUNTER_KEY, NOTES_KEY, STACKS_KEY};
use notestack_domain::{BackupSnapshot, NoteOverrides, Session, StackType};
use notestack_persistence::{JsonFileStore, MemoryStore};
use std::sync::Arc;
use tempfile::tempdir;

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
    ))
}

#[test]
fn test_session_survives_restart_on_disk() {
    let dir = tempdir().unwrap();
    let config = AppConfig::default();

    let (notes, stacks) = {
        let mut session = Session::open(JsonFileStore::new(dir.path()), clock(), &config).unwrap();
        let a = session.create_note("Buy milk 15m --p", NoteOverrides::none()).unwrap();
        let b = session.create_note("Call mum !! --h", NoteOverrides::focused()).unwrap();
        let c = session.create_note("Post letter", NoteOverrides::none()).unwrap();
        session
            .create_stack(&[a.id, b.id], StackType::Sequential, Some("Errands".into()))
            .unwrap();
        session.complete_note(c.id).unwrap();
        (
            session.board().notes().to_vec(),
            session.board().stacks().to_vec(),
        )
    };

    for key in [NOTES_KEY, STACKS_KEY, COUNTER_KEY] {
        assert!(dir.path().join(format!("{key}.json")).exists());
    }

    let reopened = Session::open(JsonFileStore::new(dir.path()), clock(), &config).unwrap();
    assert_eq!(reopened.board().notes(), notes.as_slice());
    assert_eq!(reopened.board().stacks(), stacks.as_slice());
    assert_eq!(reopened.board().completed_today(), 1);
    reopened.board().check_invariants().unwrap();
}

#[test]
fn test_backup_moves_state_between_stores() {
    let mut source = Session::open(MemoryStore::new(), clock(), &AppConfig::default()).unwrap();
    source.scan_plan("group: Garden\n- water 5m\n- weed 20m\n/").unwrap();
    let json = source.export_backup().to_json().unwrap();

    let dir = tempdir().unwrap();
    let mut target = Session::open(JsonFileStore::new(dir.path()), clock(), &AppConfig::default()).unwrap();
    target.create_note("replaced by import", NoteOverrides::none()).unwrap();
    target.import_backup(BackupSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(target.board().notes(), source.board().notes());
    assert!(target.undo_history().is_empty());

    let reopened = Session::open(JsonFileStore::new(dir.path()), clock(), &AppConfig::default()).unwrap();
    assert_eq!(reopened.board().stacks().len(), 1);
    assert_eq!(reopened.board().stacks()[0].title.as_deref(), Some("Garden"));
}

#[test]
fn test_failing_memory_store_keeps_session_usable() {
    let mut store = MemoryStore::new();
    store.set_failing(true);
    let mut session = Session::open(store, clock(), &AppConfig::default()).unwrap();

    assert!(session
        .create_note("offline note", NoteOverrides::none())
        .unwrap_err()
        .is_persistence());
    assert_eq!(session.board().notes().len(), 1);
    assert_eq!(session.store().writes(), 0);
    assert!(!session.store().contains_key(NOTES_KEY));
}
