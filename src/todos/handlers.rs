use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    todos::dto::{Pagination, TodoResponse, TodoSaveRequest},
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:todo_id", get(get_todo))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<TodoSaveRequest>,
) -> AppResult<(StatusCode, Json<TodoResponse>)> {
    if payload.title.trim().is_empty() {
        warn!(user_id = caller.id, "blank todo title");
        return Err(AppError::validation("Title is required"));
    }

    let todo = state
        .todos
        .create_todo(&caller, &payload.title, payload.contents.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

#[instrument(skip(state, _caller))]
pub async fn list_todos(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<TodoResponse>>> {
    let todos = state.todos.list_todos(p.limit, p.offset).await?;
    Ok(Json(todos.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, _caller))]
pub async fn get_todo(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(todo_id): Path<i64>,
) -> AppResult<Json<TodoResponse>> {
    let todo = state.todos.get_todo(todo_id).await?;
    Ok(Json(todo.into()))
}
