use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_opt_i64, get_opt_str, get_required_str, require_actor, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::enroll;

fn enroll_submit(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let full_name = get_required_str(params, "fullName")?;
    let phone = get_required_str(params, "phone")?;
    let user_id = get_opt_str(params, "userId");
    let age = get_opt_i64(params, "age");
    let experience = get_opt_str(params, "experience");
    let request = enroll::submit_request(
        conn,
        &actor,
        &course_id,
        user_id.as_deref(),
        &full_name,
        age,
        experience.as_deref(),
        &phone,
    )?;
    Ok(json!({ "request": request }))
}

fn enroll_set_status(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let request_id = get_required_str(params, "requestId")?;
    let status = get_required_str(params, "status")?;
    enroll::set_request_status(conn, &actor, &request_id, &status)?;
    Ok(json!({ "ok": true }))
}

fn enroll_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_opt_str(params, "courseId");
    let requests = enroll::list_requests(conn, &actor, course_id.as_deref())?;
    Ok(json!({ "requests": requests }))
}

fn handle_enroll_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match enroll_submit(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_enroll_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match enroll_set_status(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_enroll_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match enroll_list(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "enroll.submit" => Some(handle_enroll_submit(state, req)),
        "enroll.setStatus" => Some(handle_enroll_set_status(state, req)),
        "enroll.list" => Some(handle_enroll_list(state, req)),
        _ => None,
    }
}
