use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::error::StoreError;
use super::schedule;
use super::types::{new_id, now_ts, AttendanceRecord, Caller, MarkStatus};

/// Advance the mark for (month, student, lesson) one step along
/// Unset -> Present -> Absent -> Unset and return the new status.
///
/// The transition is decided by a single upsert keyed on the record's
/// unique triple, so concurrent togglers serialize on the constraint
/// instead of racing a read-then-write. A mark that lands on `Unset` is
/// deleted in the same transaction; the table stays sparse.
pub fn toggle_mark(
    conn: &Connection,
    caller: &Caller,
    month_id: &str,
    student_id: &str,
    lesson_index: i64,
) -> Result<MarkStatus, StoreError> {
    let month = schedule::get_month(conn, month_id)?.ok_or(StoreError::NotFound("month"))?;
    let student: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM course_students WHERE id = ?1",
            (student_id,),
            |r| r.get(0),
        )
        .optional()?;
    if student.is_none() {
        return Err(StoreError::NotFound("student"));
    }
    if lesson_index < 0 || lesson_index as usize >= month.lesson_dates.len() {
        return Err(StoreError::Validation(format!(
            "lessonIndex {lesson_index} is outside the {} scheduled dates",
            month.lesson_dates.len()
        )));
    }

    let tx = conn.unchecked_transaction()?;
    let raw: String = tx.query_row(
        "INSERT INTO attendance_records(id, month_id, student_id, lesson_index, status, created_at)
         VALUES (?1, ?2, ?3, ?4, 'present', ?5)
         ON CONFLICT(month_id, student_id, lesson_index) DO UPDATE SET
             status = CASE attendance_records.status
                 WHEN 'present' THEN 'absent'
                 WHEN 'absent' THEN 'unset'
                 ELSE 'present'
             END
         RETURNING status",
        params![new_id(), month_id, student_id, lesson_index, now_ts()],
        |r| r.get(0),
    )?;
    let status = MarkStatus::from_db(&raw)
        .ok_or_else(|| StoreError::Transient(format!("unexpected status word '{raw}'")))?;
    if status == MarkStatus::Unset {
        tx.execute(
            "DELETE FROM attendance_records
             WHERE month_id = ?1 AND student_id = ?2 AND lesson_index = ?3",
            params![month_id, student_id, lesson_index],
        )?;
    }
    tx.commit()?;
    info!(
        caller = %caller.id,
        month = month_id,
        student = student_id,
        lesson = lesson_index,
        status = status.as_db(),
        "attendance mark toggled"
    );
    Ok(status)
}

pub fn list_records(
    conn: &Connection,
    caller: &Caller,
    month_id: &str,
) -> Result<Vec<AttendanceRecord>, StoreError> {
    let known: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM attendance_months WHERE id = ?1",
            (month_id,),
            |r| r.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(StoreError::NotFound("month"));
    }
    let mut stmt = conn.prepare(
        "SELECT id, month_id, student_id, lesson_index, status, created_at
         FROM attendance_records
         WHERE month_id = ?1
         ORDER BY student_id, lesson_index",
    )?;
    let rows = stmt.query_map((month_id,), |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, month_id, student_id, lesson_index, raw_status, created_at) = row?;
        let Some(status) = MarkStatus::from_db(&raw_status) else {
            warn!(record = %id, status = %raw_status, "skipping record with unknown status word");
            continue;
        };
        out.push(AttendanceRecord {
            id,
            month_id,
            student_id,
            lesson_index,
            status,
            created_at,
        });
    }
    debug!(caller = %caller.id, month = month_id, records = out.len(), "records listed");
    Ok(out)
}
