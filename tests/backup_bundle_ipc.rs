use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_academyd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn academyd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn actor() -> serde_json::Value {
    json!({ "id": "admin-1", "role": "admin" })
}

fn seed_workspace(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, path: &PathBuf) {
    let _ = request_ok(
        stdin,
        reader,
        "ws-a",
        "workspace.select",
        json!({ "path": path.to_string_lossy() }),
    );
    let _ = request_ok(
        stdin,
        reader,
        "reg",
        "courses.register",
        json!({ "actor": actor(), "courseId": "migrated-course" }),
    );
    let _ = request_ok(
        stdin,
        reader,
        "add",
        "roster.addStudent",
        json!({
            "actor": actor(),
            "courseId": "migrated-course",
            "fullName": "Carried Over",
            "phone": "+998 90 123-45-67"
        }),
    );
}

#[test]
fn exported_bundle_imports_into_a_fresh_workspace() {
    let ws_a = temp_dir("academyd-bundle-src");
    let ws_b = temp_dir("academyd-bundle-dst");
    let out_dir = temp_dir("academyd-bundle-out");
    let bundle = out_dir.join("academy-backup.zip");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    seed_workspace(&mut stdin, &mut reader, &ws_a);

    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "export",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": bundle.to_string_lossy() }),
    );
    assert_eq!(
        exported["bundleFormat"].as_str(),
        Some("academy-workspace-v1")
    );
    assert_eq!(exported["entryCount"].as_u64(), Some(3));
    let sha = exported["dbSha256"].as_str().expect("dbSha256");
    assert_eq!(sha.len(), 64);
    assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(bundle.is_file());

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "import",
        "backup.importWorkspaceBundle",
        json!({
            "inPath": bundle.to_string_lossy(),
            "workspacePath": ws_b.to_string_lossy()
        }),
    );
    assert_eq!(
        imported["bundleFormatDetected"].as_str(),
        Some("academy-workspace-v1")
    );
    assert_eq!(
        imported["workspacePath"].as_str(),
        Some(ws_b.to_string_lossy().as_ref())
    );

    // The import switched the live workspace; reads now come from the copy.
    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "list",
        "roster.list",
        json!({ "actor": actor(), "courseId": "migrated-course" }),
    );
    let students = listed["students"].as_array().expect("students array");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["fullName"].as_str(), Some("Carried Over"));
}

#[test]
fn bare_sqlite_file_is_accepted_as_legacy_input() {
    let ws_a = temp_dir("academyd-legacy-src");
    let ws_b = temp_dir("academyd-legacy-dst");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    seed_workspace(&mut stdin, &mut reader, &ws_a);

    let db_file = ws_a.join("academy.sqlite3");
    assert!(db_file.is_file());

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "import",
        "backup.importWorkspaceBundle",
        json!({
            "inPath": db_file.to_string_lossy(),
            "workspacePath": ws_b.to_string_lossy()
        }),
    );
    assert_eq!(
        imported["bundleFormatDetected"].as_str(),
        Some("legacy-sqlite3")
    );

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "list",
        "roster.list",
        json!({ "actor": actor(), "courseId": "migrated-course" }),
    );
    assert_eq!(listed["students"].as_array().expect("students").len(), 1);
}

#[test]
fn import_of_a_missing_bundle_is_not_found() {
    let ws = temp_dir("academyd-missing-bundle");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": ws.to_string_lossy() }),
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "import",
        "backup.importWorkspaceBundle",
        json!({ "inPath": ws.join("nope.zip").to_string_lossy() }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );
}
