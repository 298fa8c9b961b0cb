//! Authenticated in-memory TODO list API.
//!
//! # Overview
//! `POST /api/login` trades a fixed operator credential pair for a signed
//! bearer token; the `/api/todo` routes create, list, update and delete items
//! held in process memory. Every response uses the same JSON envelope
//! (see [`envelope`]).
//!
//! # Design
//! - All shared state lives in [`AppState`] and is injected per router, so
//!   tests can build as many isolated servers as they like.
//! - The store is the only shared mutable resource; handlers hold its lock
//!   only for the duration of a single synchronous call.
//! - Nothing survives a restart.

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::{Credentials, TokenService};
use crate::config::Config;
use crate::store::TodoStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TodoStore>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(credentials: Credentials, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(TodoStore::new()),
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.credentials.clone(),
            TokenService::new(config.token.secret.as_bytes(), config.token.ttl),
        )
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(&state)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
