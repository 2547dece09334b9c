use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::AppResult,
    managers::dto::{ManagerResponse, ManagerSaveRequest},
    state::AppState,
};

pub fn manager_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/todos/:todo_id/managers",
            get(get_managers).post(save_manager),
        )
        .route(
            "/todos/:todo_id/managers/:manager_user_id",
            delete(delete_manager),
        )
}

#[instrument(skip(state))]
pub async fn save_manager(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(todo_id): Path<i64>,
    Json(payload): Json<ManagerSaveRequest>,
) -> AppResult<(StatusCode, Json<ManagerResponse>)> {
    let manager = state
        .managers
        .save_manager(&caller, todo_id, payload.manager_user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(manager.into())))
}

#[instrument(skip(state, _caller))]
pub async fn get_managers(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(todo_id): Path<i64>,
) -> AppResult<Json<Vec<ManagerResponse>>> {
    let managers = state.managers.get_managers(todo_id).await?;
    Ok(Json(managers.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_manager(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((todo_id, manager_user_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .managers
        .delete_manager(&caller, todo_id, manager_user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
