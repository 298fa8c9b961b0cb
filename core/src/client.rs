//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Responses are unwrapped from the server's `{status, data, error_message}`
//! envelope; error envelopes become `ApiError`s keyed on the HTTP status.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, Status, Todo, TodoInput};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `POST /api/login` with HTTP Basic credentials.
    pub fn build_login(&self, username: &str, password: &str) -> HttpRequest {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/login", self.base_url),
            headers: vec![("authorization".to_string(), format!("Basic {credentials}"))],
            body: None,
        }
    }

    pub fn build_list_todos(&self, token: &str) -> HttpRequest {
        self.authed(HttpMethod::Get, "/api/todo", token, None)
    }

    pub fn build_create_todo(&self, token: &str, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.authed(HttpMethod::Post, "/api/todo", token, Some(body)))
    }

    pub fn build_update_todo(
        &self,
        token: &str,
        id: &str,
        input: &TodoInput,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.authed(HttpMethod::Put, &format!("/api/todo/{id}"), token, Some(body)))
    }

    pub fn build_delete_todo(&self, token: &str, id: &str) -> HttpRequest {
        self.authed(HttpMethod::Delete, &format!("/api/todo/{id}"), token, None)
    }

    /// Extract the bearer token from a login response.
    pub fn parse_login(&self, response: HttpResponse) -> Result<String, ApiError> {
        open(response)
    }

    /// Every todo operation answers with the full list, oldest first.
    pub fn parse_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        open(response)
    }

    fn authed(&self, method: HttpMethod, path: &str, token: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), format!("Bearer {token}"))];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

fn encode(input: &TodoInput) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Unwrap the envelope, mapping error envelopes onto `ApiError`.
fn open<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let envelope: Envelope<T> = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(e) if response.is_success() => {
            return Err(ApiError::DeserializationError(e.to_string()))
        }
        Err(_) => return Err(rejection(response.status, response.body)),
    };

    match envelope.status {
        Status::Ok => envelope
            .data
            .ok_or_else(|| ApiError::DeserializationError("ok envelope without data".to_string())),
        Status::Error => Err(rejection(
            response.status,
            envelope.error_message.unwrap_or_default(),
        )),
    }
}

fn rejection(status: u16, message: String) -> ApiError {
    match status {
        401 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Rejected { status, message },
    }
}
