use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_required_str, require_actor, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::schedule;

fn months_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let label = get_required_str(params, "label")?;
    let dates = get_required_str(params, "dates")?;
    let month = schedule::create_month(conn, &actor, &course_id, &label, &dates)?;
    Ok(json!({ "month": month }))
}

fn months_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let months = schedule::list_months(conn, &actor, &course_id)?;
    Ok(json!({ "months": months }))
}

fn months_delete(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let month_id = get_required_str(params, "monthId")?;
    schedule::delete_month(conn, &actor, &month_id)?;
    Ok(json!({ "ok": true }))
}

fn handle_months_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match months_create(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_months_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match months_list(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_months_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match months_delete(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "months.create" => Some(handle_months_create(state, req)),
        "months.list" => Some(handle_months_list(state, req)),
        "months.delete" => Some(handle_months_delete(state, req)),
        _ => None,
    }
}
