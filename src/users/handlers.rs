use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser, error::AppResult, state::AppState, users::dto::UserResponse,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users/:user_id", get(get_user))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(caller.id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(user_id).await?;
    Ok(Json(user.into()))
}
