use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, warn};

use super::error::StoreError;
use super::types::{Caller, MarkStatus};

/// Marks for one month keyed student id -> lesson index -> status. Triples
/// without a stored record are absent from the map; readers treat missing
/// as `Unset`.
pub type MonthMarks = HashMap<String, HashMap<i64, MarkStatus>>;

pub fn build_view(
    conn: &Connection,
    caller: &Caller,
    month_id: &str,
) -> Result<MonthMarks, StoreError> {
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
        "SELECT student_id, lesson_index, status
         FROM attendance_records
         WHERE month_id = ?1",
    )?;
    let rows = stmt.query_map((month_id,), |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut marks: MonthMarks = HashMap::new();
    for row in rows {
        let (student_id, lesson_index, raw_status) = row?;
        let Some(status) = MarkStatus::from_db(&raw_status) else {
            warn!(
                month = month_id,
                student = %student_id,
                status = %raw_status,
                "skipping mark with unknown status word"
            );
            continue;
        };
        marks
            .entry(student_id)
            .or_default()
            .insert(lesson_index, status);
    }
    debug!(caller = %caller.id, month = month_id, students = marks.len(), "month view built");
    Ok(marks)
}
