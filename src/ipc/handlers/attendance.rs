use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_required_i64, get_required_str, require_actor, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{ledger, schedule, view, StoreError};

fn attendance_toggle_mark(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let month_id = get_required_str(params, "monthId")?;
    let student_id = get_required_str(params, "studentId")?;
    let lesson_index = get_required_i64(params, "lessonIndex")?;
    let status = ledger::toggle_mark(conn, &actor, &month_id, &student_id, lesson_index)?;
    Ok(json!({ "status": status }))
}

fn attendance_month_view(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let month_id = get_required_str(params, "monthId")?;
    let month = schedule::get_month(conn, &month_id)?.ok_or(StoreError::NotFound("month"))?;
    let marks = view::build_view(conn, &actor, &month_id)?;
    Ok(json!({ "month": month, "marks": marks }))
}

fn attendance_list_records(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let month_id = get_required_str(params, "monthId")?;
    let records = ledger::list_records(conn, &actor, &month_id)?;
    Ok(json!({ "records": records }))
}

fn handle_attendance_toggle_mark(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match attendance_toggle_mark(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_attendance_month_view(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match attendance_month_view(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_attendance_list_records(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match attendance_list_records(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.toggleMark" => Some(handle_attendance_toggle_mark(state, req)),
        "attendance.monthView" => Some(handle_attendance_month_view(state, req)),
        "attendance.listRecords" => Some(handle_attendance_list_records(state, req)),
        _ => None,
    }
}
