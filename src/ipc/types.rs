use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

/// One request frame: `{id, method, params}`. `params` defaults to JSON
/// null so parameterless methods can omit it.
#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// One sidecar session: at most one workspace open at a time.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
}
