use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_opt_str, get_required_str, require_actor, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::roster;

fn roster_add_student(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let full_name = get_required_str(params, "fullName")?;
    let phone = get_required_str(params, "phone")?;
    let notes = get_opt_str(params, "notes");
    let student = roster::add_student(
        conn,
        &actor,
        &course_id,
        &full_name,
        &phone,
        notes.as_deref(),
    )?;
    Ok(json!({ "student": student }))
}

fn roster_remove_student(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let student_id = get_required_str(params, "studentId")?;
    roster::remove_student(conn, &actor, &student_id)?;
    Ok(json!({ "ok": true }))
}

fn roster_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_actor(params)?;
    let course_id = get_required_str(params, "courseId")?;
    let students = roster::list_students(conn, &actor, &course_id)?;
    Ok(json!({ "students": students }))
}

fn handle_roster_add_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match roster_add_student(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_roster_remove_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match roster_remove_student(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match roster_list(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.addStudent" => Some(handle_roster_add_student(state, req)),
        "roster.removeStudent" => Some(handle_roster_remove_student(state, req)),
        "roster.list" => Some(handle_roster_list(state, req)),
        _ => None,
    }
}
