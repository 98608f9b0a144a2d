use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::courses::course_exists;
use super::error::StoreError;
use super::types::{new_id, now_ts, Caller, Student};
use super::MAX_ROSTER_SIZE;

pub fn add_student(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
    full_name: &str,
    phone: &str,
    notes: Option<&str>,
) -> Result<Student, StoreError> {
    let full_name = full_name.trim();
    let phone = phone.trim();
    if full_name.is_empty() {
        return Err(StoreError::Validation("fullName must not be empty".into()));
    }
    if phone.is_empty() {
        return Err(StoreError::Validation("phone must not be empty".into()));
    }
    let notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);

    if !course_exists(conn, course_id)? {
        return Err(StoreError::NotFound("course"));
    }

    // The count and the insert share one transaction; two concurrent adds
    // cannot both observe room for a 25th seat.
    let tx = conn.unchecked_transaction()?;
    let current: i64 = tx.query_row(
        "SELECT COUNT(*) FROM course_students WHERE course_id = ?1",
        (course_id,),
        |r| r.get(0),
    )?;
    if current as usize >= MAX_ROSTER_SIZE {
        return Err(StoreError::Capacity {
            subject: "course roster",
            limit: MAX_ROSTER_SIZE,
        });
    }
    let student = Student {
        id: new_id(),
        course_id: course_id.to_owned(),
        full_name: full_name.to_owned(),
        phone: phone.to_owned(),
        notes,
        created_at: now_ts(),
    };
    tx.execute(
        "INSERT INTO course_students(id, course_id, full_name, phone, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            student.id,
            student.course_id,
            student.full_name,
            student.phone,
            student.notes,
            student.created_at
        ],
    )?;
    tx.commit()?;
    info!(caller = %caller.id, course = course_id, student = %student.id, "student added");
    Ok(student)
}

pub fn remove_student(
    conn: &Connection,
    caller: &Caller,
    student_id: &str,
) -> Result<(), StoreError> {
    let known: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM course_students WHERE id = ?1",
            (student_id,),
            |r| r.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(StoreError::NotFound("student"));
    }
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM attendance_records WHERE student_id = ?1",
        (student_id,),
    )?;
    tx.execute("DELETE FROM course_students WHERE id = ?1", (student_id,))?;
    tx.commit()?;
    info!(caller = %caller.id, student = student_id, "student removed");
    Ok(())
}

pub fn list_students(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
) -> Result<Vec<Student>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, full_name, phone, notes, created_at
         FROM course_students
         WHERE course_id = ?1
         ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map((course_id,), |row| {
        Ok(Student {
            id: row.get(0)?,
            course_id: row.get(1)?,
            full_name: row.get(2)?,
            phone: row.get(3)?,
            notes: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    debug!(caller = %caller.id, course = course_id, students = out.len(), "roster listed");
    Ok(out)
}
