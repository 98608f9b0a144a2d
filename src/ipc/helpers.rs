use serde_json::json;

use crate::ipc::error::err;
use crate::store::{Caller, StoreError};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<StoreError> for HandlerErr {
    fn from(e: StoreError) -> Self {
        let details = match &e {
            StoreError::Capacity { subject, limit } => Some(json!({
                "subject": subject,
                "limit": limit,
            })),
            _ => None,
        };
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub fn get_opt_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub fn get_required_i64(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub fn get_opt_i64(params: &serde_json::Value, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

/// Every store-backed method names its acting user. The id is recorded in
/// logs; no authorization happens on this side of the boundary.
pub fn require_actor(params: &serde_json::Value) -> Result<Caller, HandlerErr> {
    let actor = params
        .get("actor")
        .ok_or_else(|| HandlerErr::bad_params("missing actor"))?;
    let caller: Caller = serde_json::from_value(actor.clone())
        .map_err(|_| HandlerErr::bad_params("actor must be { id, role? }"))?;
    if caller.id.trim().is_empty() {
        return Err(HandlerErr::bad_params("actor.id must not be empty"));
    }
    Ok(caller)
}
