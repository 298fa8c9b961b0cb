//! Wire DTOs for the todo API.
//!
//! # Design
//! These mirror the server's schema but are defined independently so the
//! client never links against Axum. The live integration test catches any
//! drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub name: String,
    pub details: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for both create and update. Update replaces all three
/// fields, so callers send the full set every time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub done: bool,
}

impl From<&Todo> for TodoInput {
    fn from(todo: &Todo) -> Self {
        Self {
            name: todo.name.clone(),
            details: todo.details.clone(),
            done: todo.done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// The response wrapper every endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
