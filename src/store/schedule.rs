use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::courses::course_exists;
use super::error::StoreError;
use super::types::{new_id, now_ts, Caller, Month};
use super::MAX_LESSON_DATES;

/// Normalize a free-text date list: commas and newlines both separate,
/// entries are trimmed, blanks are dropped, everything past the cap is
/// silently discarded. Dates stay opaque strings in input order.
pub fn parse_lesson_dates(raw: &str) -> Vec<String> {
    raw.replace('\r', "")
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .take(MAX_LESSON_DATES)
        .map(str::to_owned)
        .collect()
}

fn decode_lesson_dates(month_id: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(mut dates) => {
            dates.truncate(MAX_LESSON_DATES);
            dates
        }
        Err(e) => {
            warn!(month = month_id, error = %e, "stored lesson dates unreadable, treating as empty");
            Vec::new()
        }
    }
}

pub fn create_month(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
    label: &str,
    dates_text: &str,
) -> Result<Month, StoreError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(StoreError::Validation("label must not be empty".into()));
    }
    if !course_exists(conn, course_id)? {
        return Err(StoreError::NotFound("course"));
    }
    let lesson_dates = parse_lesson_dates(dates_text);
    if lesson_dates.is_empty() {
        return Err(StoreError::Validation(
            "at least one lesson date is required".into(),
        ));
    }

    let month = Month {
        id: new_id(),
        course_id: course_id.to_owned(),
        label: label.to_owned(),
        lesson_dates,
        created_at: now_ts(),
    };
    let encoded = serde_json::to_string(&month.lesson_dates)?;
    conn.execute(
        "INSERT INTO attendance_months(id, course_id, label, lesson_dates, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![month.id, month.course_id, month.label, encoded, month.created_at],
    )?;
    info!(
        caller = %caller.id,
        course = course_id,
        month = %month.id,
        dates = month.lesson_dates.len(),
        "attendance month created"
    );
    Ok(month)
}

pub fn get_month(conn: &Connection, month_id: &str) -> Result<Option<Month>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, course_id, label, lesson_dates, created_at
             FROM attendance_months
             WHERE id = ?1",
            (month_id,),
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    Ok(row.map(|(id, course_id, label, raw_dates, created_at)| {
        let lesson_dates = decode_lesson_dates(&id, &raw_dates);
        Month {
            id,
            course_id,
            label,
            lesson_dates,
            created_at,
        }
    }))
}

pub fn list_months(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
) -> Result<Vec<Month>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, label, lesson_dates, created_at
         FROM attendance_months
         WHERE course_id = ?1
         ORDER BY created_at DESC, id",
    )?;
    let rows = stmt.query_map((course_id,), |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, course_id, label, raw_dates, created_at) = row?;
        let lesson_dates = decode_lesson_dates(&id, &raw_dates);
        out.push(Month {
            id,
            course_id,
            label,
            lesson_dates,
            created_at,
        });
    }
    debug!(caller = %caller.id, course = course_id, months = out.len(), "months listed");
    Ok(out)
}

pub fn delete_month(conn: &Connection, caller: &Caller, month_id: &str) -> Result<(), StoreError> {
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
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM attendance_records WHERE month_id = ?1",
        (month_id,),
    )?;
    tx.execute("DELETE FROM attendance_months WHERE id = ?1", (month_id,))?;
    tx.commit()?;
    info!(caller = %caller.id, month = month_id, "attendance month deleted");
    Ok(())
}
