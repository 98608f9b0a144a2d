use academyd::db::open_db;
use academyd::store::{self, Caller, MarkStatus, StoreError};
use rusqlite::Connection;
use tempfile::TempDir;

fn open_store() -> (TempDir, Connection) {
    let dir = TempDir::new().unwrap();
    let conn = open_db(dir.path()).unwrap();
    (dir, conn)
}

fn teacher() -> Caller {
    Caller {
        id: "teacher-1".to_string(),
        role: Some("teacher".to_string()),
    }
}

struct Seeded {
    student_id: String,
    month_id: String,
}

fn seed(conn: &Connection, dates: &str) -> Seeded {
    let caller = teacher();
    store::courses::register_course(conn, &caller, "speaking-club").unwrap();
    let student = store::roster::add_student(
        conn,
        &caller,
        "speaking-club",
        "Bobur Aliyev",
        "+998 91 234-56-78",
        None,
    )
    .unwrap();
    let month =
        store::schedule::create_month(conn, &caller, "speaking-club", "September", dates).unwrap();
    Seeded {
        student_id: student.id,
        month_id: month.id,
    }
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM attendance_records", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn toggle_cycle_inserts_updates_and_deletes_one_row() {
    let (_dir, conn) = open_store();
    let caller = teacher();
    let seeded = seed(&conn, "01.09, 03.09");

    let status =
        store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0)
            .unwrap();
    assert_eq!(status, MarkStatus::Present);
    assert_eq!(row_count(&conn), 1);

    let status =
        store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0)
            .unwrap();
    assert_eq!(status, MarkStatus::Absent);
    assert_eq!(row_count(&conn), 1);

    let status =
        store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0)
            .unwrap();
    assert_eq!(status, MarkStatus::Unset);
    assert_eq!(row_count(&conn), 0);

    let status =
        store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0)
            .unwrap();
    assert_eq!(status, MarkStatus::Present);
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn repeated_toggles_never_duplicate_the_triple() {
    let (_dir, conn) = open_store();
    let caller = teacher();
    let seeded = seed(&conn, "01.09");

    let mut last = MarkStatus::Unset;
    for _ in 0..7 {
        last = store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0)
            .unwrap();
        assert!(row_count(&conn) <= 1);
    }
    // Seven steps from unset land on present.
    assert_eq!(last, MarkStatus::Present);
    let triples: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM attendance_records
             WHERE month_id = ?1 AND student_id = ?2 AND lesson_index = 0",
            (&seeded.month_id, &seeded.student_id),
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(triples, 1);
}

#[test]
fn lesson_index_must_address_a_scheduled_date() {
    let (_dir, conn) = open_store();
    let caller = teacher();
    let seeded = seed(&conn, "01.09, 03.09");

    let err = store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 2)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err = store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, -1)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    assert_eq!(row_count(&conn), 0);
}

#[test]
fn toggling_against_missing_rows_is_not_found() {
    let (_dir, conn) = open_store();
    let caller = teacher();
    let seeded = seed(&conn, "01.09");

    let err =
        store::ledger::toggle_mark(&conn, &caller, "no-such-month", &seeded.student_id, 0)
            .unwrap_err();
    assert!(matches!(err, StoreError::NotFound("month")));

    let err = store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, "no-such-student", 0)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound("student")));

    let err = store::ledger::list_records(&conn, &caller, "no-such-month").unwrap_err();
    assert!(matches!(err, StoreError::NotFound("month")));
}

#[test]
fn marks_for_two_students_stay_separate() {
    let (_dir, conn) = open_store();
    let caller = teacher();
    let seeded = seed(&conn, "01.09, 03.09, 05.09");
    let second = store::roster::add_student(
        &conn,
        &caller,
        "speaking-club",
        "Malika Yusupova",
        "+998 93 555-44-33",
        None,
    )
    .unwrap();

    store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &seeded.student_id, 0).unwrap();
    store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &second.id, 2).unwrap();
    store::ledger::toggle_mark(&conn, &caller, &seeded.month_id, &second.id, 2).unwrap();

    let marks = store::view::build_view(&conn, &caller, &seeded.month_id).unwrap();
    assert_eq!(
        marks[&seeded.student_id].get(&0),
        Some(&MarkStatus::Present)
    );
    assert!(marks[&seeded.student_id].get(&2).is_none());
    assert_eq!(marks[&second.id].get(&2), Some(&MarkStatus::Absent));

    let records = store::ledger::list_records(&conn, &caller, &seeded.month_id).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.month_id == seeded.month_id && r.lesson_index >= 0));
}
