use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::courses::course_exists;
use super::error::StoreError;
use super::types::{new_id, now_ts, Caller, EnrollmentRequest};

pub const REQUEST_STATUSES: [&str; 4] = ["new", "reviewed", "approved", "rejected"];

const PHONE_CHARSET: &str = "0123456789+- ()";
const AGE_RANGE: std::ops::RangeInclusive<i64> = 10..=80;

fn phone_is_clean(phone: &str) -> bool {
    phone.chars().all(|c| PHONE_CHARSET.contains(c))
}

pub fn submit_request(
    conn: &Connection,
    caller: &Caller,
    course_id: &str,
    user_id: Option<&str>,
    full_name: &str,
    age: Option<i64>,
    experience: Option<&str>,
    phone: &str,
) -> Result<EnrollmentRequest, StoreError> {
    let full_name = full_name.trim();
    let phone = phone.trim();
    if full_name.is_empty() {
        return Err(StoreError::Validation("fullName must not be empty".into()));
    }
    if phone.is_empty() || !phone_is_clean(phone) {
        return Err(StoreError::Validation(
            "phone may only contain digits, spaces, and + - ( )".into(),
        ));
    }
    // Implausible ages are discarded, not rejected.
    let age = age.filter(|a| AGE_RANGE.contains(a));
    let experience = experience
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned);
    let user_id = user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned);

    if !course_exists(conn, course_id)? {
        return Err(StoreError::NotFound("course"));
    }

    let request = EnrollmentRequest {
        id: new_id(),
        course_id: course_id.to_owned(),
        user_id,
        full_name: full_name.to_owned(),
        age,
        experience,
        phone: phone.to_owned(),
        status: "new".to_owned(),
        created_at: now_ts(),
    };
    conn.execute(
        "INSERT INTO enrollment_requests(id, course_id, user_id, full_name, age, experience, phone, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            request.id,
            request.course_id,
            request.user_id,
            request.full_name,
            request.age,
            request.experience,
            request.phone,
            request.status,
            request.created_at
        ],
    )?;
    info!(caller = %caller.id, course = course_id, request = %request.id, "enrollment request submitted");
    Ok(request)
}

pub fn set_request_status(
    conn: &Connection,
    caller: &Caller,
    request_id: &str,
    status: &str,
) -> Result<(), StoreError> {
    if !REQUEST_STATUSES.contains(&status) {
        return Err(StoreError::Validation(format!(
            "unknown request status '{status}'"
        )));
    }
    let changed = conn.execute(
        "UPDATE enrollment_requests SET status = ?1 WHERE id = ?2",
        (status, request_id),
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound("enrollment request"));
    }
    info!(caller = %caller.id, request = request_id, status = status, "enrollment request status set");
    Ok(())
}

pub fn list_requests(
    conn: &Connection,
    caller: &Caller,
    course_id: Option<&str>,
) -> Result<Vec<EnrollmentRequest>, StoreError> {
    let mut out = Vec::new();
    match course_id {
        Some(course_id) => {
            let mut stmt = conn.prepare(
                "SELECT id, course_id, user_id, full_name, age, experience, phone, status, created_at
                 FROM enrollment_requests
                 WHERE course_id = ?1
                 ORDER BY created_at DESC, id",
            )?;
            let rows = stmt.query_map((course_id,), request_from_row)?;
            for row in rows {
                out.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, course_id, user_id, full_name, age, experience, phone, status, created_at
                 FROM enrollment_requests
                 ORDER BY created_at DESC, id",
            )?;
            let rows = stmt.query_map([], request_from_row)?;
            for row in rows {
                out.push(row?);
            }
        }
    }
    debug!(caller = %caller.id, requests = out.len(), "enrollment requests listed");
    Ok(out)
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<EnrollmentRequest> {
    Ok(EnrollmentRequest {
        id: row.get(0)?,
        course_id: row.get(1)?,
        user_id: row.get(2)?,
        full_name: row.get(3)?,
        age: row.get(4)?,
        experience: row.get(5)?,
        phone: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
    })
}
