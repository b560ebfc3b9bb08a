//! Frames written to live connections.
//!
//! Every frame has the shape `{"type": <string>, "content": {"data": <payload>}}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// Message type of sensor reading batches.
pub const DIAGRAM_FRAME: &str = "diagram";
/// Message type of keepalive frames.
pub const HEARTBEAT_FRAME: &str = "heartbeat";
/// Message type of error frames.
pub const ERROR_FRAME: &str = "error";

pub const AUTHENTICATION_FAILED: &str = "Authentication failed";
pub const AUTHENTICATION_TIMEOUT: &str = "Authentication timeout";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameContent {
    pub data: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFrame {
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: FrameContent,
}

impl LiveFrame {
    pub fn new(message_type: impl Into<String>, data: JsonValue) -> Self {
        Self {
            message_type: message_type.into(),
            content: FrameContent { data },
        }
    }

    pub fn heartbeat() -> Self {
        Self::new(HEARTBEAT_FRAME, json!("ping"))
    }

    pub fn error(message: &str) -> Self {
        Self::new(ERROR_FRAME, json!({ "message": message }))
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
