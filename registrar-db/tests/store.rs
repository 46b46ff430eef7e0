use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use registrar_db::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn open_memory_is_seeded() {
    init_logging();
    let store = Registrar::open_memory().unwrap();
    assert_eq!(store.table_counts().unwrap().students, 17);
    assert_eq!(store.get_course(1).unwrap().unwrap().name, "Capstone");
}

#[test]
fn in_memory_stores_are_isolated() {
    init_logging();
    let a = Registrar::open_memory().unwrap();
    let b = Registrar::open_memory().unwrap();

    a.register_by_id(1, 2).unwrap();
    assert!(a.is_enrolled(1, 2).unwrap());
    assert!(!b.is_enrolled(1, 2).unwrap());
}

#[test]
fn setup_again_is_already_initialized() {
    init_logging();
    let store = Registrar::open_memory().unwrap();
    assert_eq!(store.setup().unwrap(), SetupOutcome::AlreadyInitialized);
    assert_eq!(store.table_counts().unwrap().courses, 8);
}

#[test]
fn store_operations_end_to_end() {
    init_logging();
    let store = Registrar::open_memory().unwrap();

    let student = store.get_student(1).unwrap().unwrap();
    let java = store.get_courses_by_name("java").unwrap().remove(0);
    assert_eq!(java.instructor.full_name(), "Eric Level");

    store.register(&student, &java).unwrap();
    assert!(matches!(
        store.register(&student, &java),
        Err(OperationError::AlreadyEnrolled { .. })
    ));

    let courses = store.get_courses_by_student_id(1).unwrap();
    assert_eq!(courses, vec![java.clone()]);

    assert!(store.drop_registration(1, java.id).unwrap());
    assert!(!store.drop_registration(1, java.id).unwrap());
    assert!(store.get_courses_by_student_id(1).unwrap().is_empty());
}

#[test]
fn with_connection_exposes_raw_connection() {
    init_logging();
    let store = Registrar::open_memory().unwrap();
    store.with_connection(|conn| {
        conn.execute("INSERT INTO Course VALUES (9, 'Orphan', NULL)", [])
            .unwrap();
    });
    assert_eq!(store.find_unresolved_courses().unwrap(), vec![9]);
    assert!(store.get_course(9).unwrap().is_none());
    assert!(store.get_instructor(1).unwrap().is_some());
}

#[test]
fn shared_store_serializes_writers() {
    init_logging();
    let store = Arc::new(Registrar::open_memory().unwrap());

    let handles: Vec<_> = (9..=16)
        .map(|student_id| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.register_by_id(student_id, 1).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let enrollments = store.list_enrollments().unwrap();
    assert_eq!(enrollments.len(), 16);
    for student_id in 9..=16 {
        assert!(store.is_enrolled(student_id, 1).unwrap());
    }
}

#[test]
fn open_on_disk_from_settings() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_database_path(dir.path().join("registrar.db"));

    {
        let store = Registrar::open(&settings).unwrap();
        store.register_by_id(2, 3).unwrap();
    }

    let store = Registrar::open(&settings).unwrap();
    assert!(store.is_enrolled(2, 3).unwrap());
    let conn = store.into_connection();
    assert!(registrar_db::is_enrolled(&conn, 2, 3).unwrap());
}

#[test]
fn store_recovers_after_panic_in_with_connection() {
    init_logging();
    let store = Registrar::open_memory().unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        store.with_connection::<()>(|_| panic!("unit of work failed"));
    }));
    assert!(result.is_err());

    // Same store keeps serving reads and writes after the lock was poisoned
    let student = store.get_student(1).unwrap().unwrap();
    assert_eq!(student.full_name(), "David Oser");
    store.register_by_id(1, 2).unwrap();
    assert!(store.is_enrolled(1, 2).unwrap());

    let conn = store.into_connection();
    assert!(registrar_db::is_enrolled(&conn, 1, 2).unwrap());
}

#[test]
fn open_from_settings_path_reads_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings_file = dir.path().join("settings.toml");
    let db_path = dir.path().join("registrar.db");
    std::fs::write(
        &settings_file,
        format!(
            "[database]\npath = {:?}\nenforce_foreign_keys = true\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();

    let store = Registrar::open_from_settings_path(&settings_file).unwrap();
    assert!(db_path.exists());
    store.register_by_id(1, 2).unwrap();
    let fk: i32 = store.with_connection(|conn| {
        conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap()
    });
    assert_eq!(fk, 1);
}

#[test]
fn open_from_missing_settings_path_uses_memory() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let store = Registrar::open_from_settings_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(store.table_counts().unwrap().students, 17);
}

#[test]
fn invalid_settings_file_is_a_store_settings_error() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings_file = dir.path().join("settings.toml");
    std::fs::write(&settings_file, "[database]\nenforce_foreign_keys = \"yes\"\n").unwrap();

    match Registrar::open_from_settings_path(&settings_file) {
        Err(StoreError::Settings(SettingsError::Parse(_))) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid settings should not open a store"),
    }
}
