use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_required_str, require_actor, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::courses;

fn courses_register(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let registered = courses::register_course(conn, &actor, &course_id)?;
    Ok(json!({ "registered": registered }))
}

fn courses_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let courses = courses::list_courses(conn, &actor)?;
    Ok(json!({ "courses": courses }))
}

fn courses_remove(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    courses::remove_course(conn, &actor, &course_id)?;
    Ok(json!({ "ok": true }))
}

fn handle_courses_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match courses_register(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match courses_list(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_courses_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match courses_remove(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.register" => Some(handle_courses_register(state, req)),
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.remove" => Some(handle_courses_remove(state, req)),
        _ => None,
    }
}
