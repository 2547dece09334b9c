use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    comments::dto::{CommentResponse, CommentSaveRequest},
    error::AppResult,
    state::AppState,
};

pub fn comment_routes() -> Router<AppState> {
    Router::new().route(
        "/todos/:todo_id/comments",
        get(get_comments).post(save_comment),
    )
}

#[instrument(skip(state, payload))]
pub async fn save_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(todo_id): Path<i64>,
    Json(payload): Json<CommentSaveRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .comments
        .save_comment(Some(&caller), todo_id, payload.contents.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[instrument(skip(state, _caller))]
pub async fn get_comments(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(todo_id): Path<i64>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comments.get_comments(todo_id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}
