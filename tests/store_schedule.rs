use academyd::db::open_db;
use academyd::store::{self, Caller, StoreError};
use rusqlite::Connection;
use tempfile::TempDir;

fn open_store() -> (TempDir, Connection) {
    let dir = TempDir::new().unwrap();
    let conn = open_db(dir.path()).unwrap();
    (dir, conn)
}

fn admin() -> Caller {
    Caller {
        id: "admin-1".to_string(),
        role: Some("admin".to_string()),
    }
}

#[test]
fn month_keeps_lesson_dates_in_input_order() {
    let (_dir, conn) = open_store();
    let caller = admin();
    store::courses::register_course(&conn, &caller, "ordering").unwrap();

    let month =
        store::schedule::create_month(&conn, &caller, "ordering", "September", "05.09,01.09\n03.09")
            .unwrap();
    assert_eq!(month.lesson_dates, vec!["05.09", "01.09", "03.09"]);

    let fetched = store::schedule::get_month(&conn, &month.id).unwrap().unwrap();
    assert_eq!(fetched.lesson_dates, month.lesson_dates);
    assert_eq!(fetched.label, "September");
}

#[test]
fn month_creation_validates_label_dates_and_course() {
    let (_dir, conn) = open_store();
    let caller = admin();
    store::courses::register_course(&conn, &caller, "strict").unwrap();

    let err = store::schedule::create_month(&conn, &caller, "strict", "   ", "01.09").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err =
        store::schedule::create_month(&conn, &caller, "strict", "October", " , ,\n").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err =
        store::schedule::create_month(&conn, &caller, "missing", "October", "01.10").unwrap_err();
    assert!(matches!(err, StoreError::NotFound("course")));
}

#[test]
fn months_list_newest_first() {
    let (_dir, conn) = open_store();
    let caller = admin();
    store::courses::register_course(&conn, &caller, "history").unwrap();

    for label in ["September", "October", "November"] {
        store::schedule::create_month(&conn, &caller, "history", label, "01, 02").unwrap();
    }
    // Creation happens within one second; spread the timestamps out so the
    // ordering assertion is deterministic.
    for (label, ts) in [
        ("September", "2026-06-01T00:00:00Z"),
        ("October", "2026-07-01T00:00:00Z"),
        ("November", "2026-08-01T00:00:00Z"),
    ] {
        conn.execute(
            "UPDATE attendance_months SET created_at = ?1 WHERE label = ?2",
            (ts, label),
        )
        .unwrap();
    }

    let months = store::schedule::list_months(&conn, &caller, "history").unwrap();
    let labels: Vec<&str> = months.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["November", "October", "September"]);
}

#[test]
fn deleting_a_month_removes_its_records() {
    let (_dir, conn) = open_store();
    let caller = admin();
    store::courses::register_course(&conn, &caller, "cleanup").unwrap();
    let student = store::roster::add_student(
        &conn,
        &caller,
        "cleanup",
        "Bobur Aliyev",
        "+998 91 234-56-78",
        None,
    )
    .unwrap();
    let month =
        store::schedule::create_month(&conn, &caller, "cleanup", "September", "01.09").unwrap();
    store::ledger::toggle_mark(&conn, &caller, &month.id, &student.id, 0).unwrap();

    store::schedule::delete_month(&conn, &caller, &month.id).unwrap();
    let records: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance_records", [], |r| r.get(0))
        .unwrap();
    assert_eq!(records, 0);
    assert!(store::schedule::get_month(&conn, &month.id).unwrap().is_none());

    let err = store::schedule::delete_month(&conn, &caller, &month.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound("month")));
}

#[test]
fn unreadable_stored_dates_read_as_an_empty_schedule() {
    let (_dir, conn) = open_store();
    let caller = admin();
    store::courses::register_course(&conn, &caller, "damaged").unwrap();
    let student = store::roster::add_student(
        &conn,
        &caller,
        "damaged",
        "Malika Yusupova",
        "+998 93 555-44-33",
        None,
    )
    .unwrap();
    let month =
        store::schedule::create_month(&conn, &caller, "damaged", "September", "01.09, 03.09")
            .unwrap();

    conn.execute(
        "UPDATE attendance_months SET lesson_dates = 'not json' WHERE id = ?1",
        (&month.id,),
    )
    .unwrap();

    let fetched = store::schedule::get_month(&conn, &month.id).unwrap().unwrap();
    assert!(fetched.lesson_dates.is_empty());

    // With zero readable dates every index is out of bounds.
    let err = store::ledger::toggle_mark(&conn, &caller, &month.id, &student.id, 0).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
