//! Requests and responses exchanged with the todo API, as plain values.
//!
//! [`crate::TodoClient`] fills in an [`HttpRequest`] with an absolute `url`,
//! an `authorization` header (Basic for login, Bearer for everything else)
//! and, for create and update, a JSON body. Whoever sends it hands the reply
//! back as an [`HttpResponse`]; its body is expected to hold the server's
//! `{status, data, error_message}` envelope.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Base url joined with the route, e.g. `http://host:3000/api/todo/{id}`.
    pub url: String,
    /// Lowercase header names.
    pub headers: Vec<(String, String)>,
    /// Serialized `TodoInput` for create and update, `None` otherwise.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers, which is all the parsers look at.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost:3000/api/todo".to_string(),
            headers: vec![("authorization".to_string(), "Bearer tok".to_string())],
            body: None,
        };
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn success_is_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(422, "").is_success());
    }

    #[test]
    fn method_renders_as_verb() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
