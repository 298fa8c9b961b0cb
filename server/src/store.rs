//! In-memory todo store.
//!
//! # Design
//! Items live in an unordered `HashMap` behind a single `parking_lot::RwLock`.
//! List order is rebuilt at read time by sorting on `created_at`, with the id
//! as tie-breaker so two items stamped in the same instant still come back in
//! a stable order.
//!
//! Every mutation validates, checks existence, writes, and snapshots inside
//! one write guard. A concurrent delete can therefore never slip between an
//! update's existence check and its write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A single todo item as stored and returned on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub name: String,
    pub details: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Client-editable fields, shared by create and update.
///
/// Every field defaults, so a body without `name` is rejected by validation
/// rather than by the JSON decoder. Unknown fields such as `id` or
/// `created_at` are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoInput {
    pub name: String,
    pub details: String,
    pub done: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("todo with id {0} does not exist")]
    NotFound(String),
}

#[derive(Debug, Default)]
pub struct TodoStore {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items, oldest first.
    pub fn list(&self) -> Vec<Todo> {
        snapshot(&self.todos.read())
    }

    pub fn len(&self) -> usize {
        self.todos.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.read().is_empty()
    }

    /// Insert a new item with a fresh id and timestamp, returning the updated list.
    pub fn add(&self, input: TodoInput) -> Result<Vec<Todo>, StoreError> {
        validate(&input)?;

        let mut todos = self.todos.write();
        // Stamped under the write guard so timestamps follow insertion order.
        let todo = Todo {
            id: Uuid::new_v4(),
            name: input.name,
            details: input.details,
            done: input.done,
            created_at: Utc::now(),
        };
        tracing::debug!(id = %todo.id, "inserting todo");
        todos.insert(todo.id, todo);
        Ok(snapshot(&todos))
    }

    /// Replace name, details and done of an existing item. The id and
    /// `created_at` are never touched.
    pub fn update(&self, id: &str, input: TodoInput) -> Result<Vec<Todo>, StoreError> {
        validate(&input)?;
        let key = parse_key(id)?;

        let mut todos = self.todos.write();
        let todo = todos
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        todo.name = input.name;
        todo.details = input.details;
        todo.done = input.done;
        Ok(snapshot(&todos))
    }

    /// Remove an existing item, returning the updated list.
    pub fn delete(&self, id: &str) -> Result<Vec<Todo>, StoreError> {
        let key = parse_key(id)?;

        let mut todos = self.todos.write();
        todos
            .remove(&key)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(snapshot(&todos))
    }
}

fn validate(input: &TodoInput) -> Result<(), StoreError> {
    if input.name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(())
}

/// Ids are opaque to clients; anything that is not one of ours is simply unknown.
fn parse_key(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::NotFound(id.to_string()))
}

fn snapshot(todos: &HashMap<Uuid, Todo>) -> Vec<Todo> {
    let mut list: Vec<Todo> = todos.values().cloned().collect();
    list.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    list
}
