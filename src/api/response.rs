//! The JSON response envelope: `{"status": bool, "message": "...", ...}`.
//!
//! Every user-visible body, success or failure, is an envelope. Payload
//! fields (`user`, `token`, `data`, ...) are attached alongside the two
//! fixed keys.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone)]
pub struct Envelope {
    body: Map<String, Value>,
}

impl Envelope {
    pub fn new(status: bool, message: &str) -> Self {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::Bool(status));
        body.insert("message".to_string(), json!(message));
        Self { body }
    }

    pub fn ok(message: &str) -> Self {
        Self::new(true, message)
    }

    pub fn fail(message: &str) -> Self {
        Self::new(false, message)
    }

    /// Attach a payload field to the envelope.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.body.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(Value::Object(self.body)).into_response()
    }
}
