use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

const MESSAGES_REQUIRED: &str = "Messages array required";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of `POST /api/chat`: `{ "messages": [{ "role", "content" }, ...] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn parse(body: &[u8]) -> Result<Self> {
        if body.is_empty() {
            return Err(AppError::BadRequest(MESSAGES_REQUIRED.into()));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;

        let items = match value.get("messages") {
            Some(Value::Array(items)) => items,
            _ => return Err(AppError::BadRequest(MESSAGES_REQUIRED.into())),
        };

        let messages = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                ChatMessage::deserialize(item)
                    .map_err(|e| AppError::BadRequest(format!("messages[{i}] is invalid: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { messages })
    }
}
