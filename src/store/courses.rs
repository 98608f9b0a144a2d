use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::error::StoreError;
use super::types::{Caller, CourseSummary};

/// Mirror a catalog course id into this subsystem. Idempotent: returns
/// whether the id was newly registered.
pub fn register_course(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
) -> Result<bool, StoreError> {
    let course_id = course_id.trim();
    if course_id.is_empty() {
        return Err(StoreError::Validation("courseId must not be empty".into()));
    }
    let inserted = conn.execute("INSERT OR IGNORE INTO courses(id) VALUES (?1)", (course_id,))?;
    if inserted == 1 {
        info!(caller = %caller.id, course = course_id, "course registered");
    }
    Ok(inserted == 1)
}

pub fn list_courses(conn: &Connection, caller: &Caller) -> Result<Vec<CourseSummary>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT c.id,
                (SELECT COUNT(*) FROM course_students s WHERE s.course_id = c.id),
                (SELECT COUNT(*) FROM attendance_months m WHERE m.course_id = c.id)
         FROM courses c
         ORDER BY c.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CourseSummary {
            id: row.get(0)?,
            student_count: row.get(1)?,
            month_count: row.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    debug!(caller = %caller.id, courses = out.len(), "courses listed");
    Ok(out)
}

/// Delete a course and every row hanging off it, children before parents,
/// in one transaction.
pub fn remove_course(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
) -> Result<(), StoreError> {
    if !course_exists(conn, course_id)? {
        return Err(StoreError::NotFound("course"));
    }

    let tx = conn.unchecked_transaction()?;
    // Records can reach the course through a month or through a student.
    tx.execute(
        "DELETE FROM attendance_records
         WHERE month_id IN (SELECT id FROM attendance_months WHERE course_id = ?1)
            OR student_id IN (SELECT id FROM course_students WHERE course_id = ?1)",
        (course_id,),
    )?;
    tx.execute(
        "DELETE FROM attendance_months WHERE course_id = ?1",
        (course_id,),
    )?;
    tx.execute(
        "DELETE FROM course_students WHERE course_id = ?1",
        (course_id,),
    )?;
    tx.execute(
        "DELETE FROM enrollment_requests WHERE course_id = ?1",
        (course_id,),
    )?;
    tx.execute("DELETE FROM courses WHERE id = ?1", (course_id,))?;
    tx.commit()?;
    info!(caller = %caller.id, course = course_id, "course removed");
    Ok(())
}

pub(crate) fn course_exists(conn: &Connection, course_id: &str) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM courses WHERE id = ?1", (course_id,), |r| {
            r.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}
