use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "academy.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    // Course rows carry identity only; titles, pricing, and teacher
    // assignments live in the catalog that registers them.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            id TEXT PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_students(
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL,
            full_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_students_course ON course_students(course_id)",
        [],
    )?;

    // lesson_dates is a JSON array of opaque date labels, at most 13 entries.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_months(
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL,
            label TEXT NOT NULL,
            lesson_dates TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_months_course ON attendance_months(course_id)",
        [],
    )?;

    // The unique key is load-bearing: concurrent toggles for one triple
    // serialize on it instead of inserting duplicate marks.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_records(
            id TEXT PRIMARY KEY,
            month_id TEXT NOT NULL,
            student_id TEXT NOT NULL,
            lesson_index INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(month_id) REFERENCES attendance_months(id),
            FOREIGN KEY(student_id) REFERENCES course_students(id),
            UNIQUE(month_id, student_id, lesson_index)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_records_month ON attendance_records(month_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_records_student ON attendance_records(student_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS enrollment_requests(
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL,
            user_id TEXT,
            full_name TEXT NOT NULL,
            age INTEGER,
            experience TEXT,
            phone TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(course_id) REFERENCES courses(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_enrollment_requests_course ON enrollment_requests(course_id)",
        [],
    )?;

    // Databases adopted from the legacy academy webapp store sigil statuses.
    migrate_sigil_statuses(&conn)?;

    Ok(conn)
}

fn migrate_sigil_statuses(conn: &Connection) -> anyhow::Result<()> {
    // Legacy encoding:
    // - '+' => 'present'
    // - '-' => 'absent'
    conn.execute(
        "UPDATE attendance_records SET status = 'present' WHERE status = '+'",
        [],
    )?;
    conn.execute(
        "UPDATE attendance_records SET status = 'absent' WHERE status = '-'",
        [],
    )?;
    Ok(())
}
