//! HTTP handlers.
//!
//! - `POST   /api/login`      exchange Basic credentials for a bearer token
//! - `GET    /api/todo`       list todos
//! - `POST   /api/todo`       create a todo
//! - `PUT    /api/todo/{id}`  replace name, details and done
//! - `DELETE /api/todo/{id}`  remove a todo
//!
//! Every `/api/todo` route sits behind [`auth::require_auth`] and every
//! successful todo operation answers with the full, ordered list. Anything
//! that matches no route, or no method on a route, still gets an envelope.
//!
//! Bodies are parsed as JSON whatever `Content-Type` the client sent.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};

use crate::auth::{self, Claims};
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::store::{Todo, TodoInput};
use crate::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let todos = Router::new()
        .route("/api/todo", get(list_todos).post(create_todo))
        .route("/api/todo/{id}", put(update_todo).delete(delete_todo))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/", get(welcome))
        .route("/api/login", post(login))
        .merge(todos)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(no_route)
}

async fn no_route(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> (StatusCode, Envelope<()>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Envelope::error(format!("method {method} is not allowed on {}", uri.path())),
    )
}

fn todo_input(body: &[u8]) -> Result<TodoInput, AppError> {
    let Json(input) = Json::<TodoInput>::from_bytes(body)?;
    Ok(input)
}

async fn welcome() -> &'static str {
    "welcome. the todo api is served under /api"
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Envelope<String>, AppError> {
    let (username, password) = auth::parse_basic_auth(&headers)
        .ok_or_else(|| AppError::Auth("unable to complete auth".to_string()))?;

    if !state.credentials.matches(&username, &password) {
        tracing::info!(%username, "login rejected");
        return Err(AppError::Auth(
            "invalid username and/or password".to_string(),
        ));
    }

    let claims = Claims::for_session(&username);
    let token = state.tokens.issue(&claims)?;
    tracing::info!(%username, session = %claims.id, "issued bearer token");
    Ok(Envelope::ok(token))
}

async fn list_todos(State(state): State<AppState>) -> Envelope<Vec<Todo>> {
    Envelope::ok(state.store.list())
}

async fn create_todo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> Result<Envelope<Vec<Todo>>, AppError> {
    let input = todo_input(&body)?;
    let todos = state.store.add(input)?;
    tracing::debug!(username = %claims.username, total = todos.len(), "created todo");
    Ok(Envelope::ok(todos))
}

async fn update_todo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Envelope<Vec<Todo>>, AppError> {
    let Path(id) = id?;
    let input = todo_input(&body)?;
    let todos = state.store.update(&id, input)?;
    tracing::debug!(username = %claims.username, %id, "updated todo");
    Ok(Envelope::ok(todos))
}

async fn delete_todo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Envelope<Vec<Todo>>, AppError> {
    let Path(id) = id?;
    let todos = state.store.delete(&id)?;
    tracing::debug!(username = %claims.username, %id, "deleted todo");
    Ok(Envelope::ok(todos))
}
