use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::delete,
    Router,
};
use tracing::instrument;

use crate::{
    admin::audit::{audited, OperationDescriptor},
    auth::AuthUser,
    error::AppResult,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/comments/:comment_id", delete(delete_comment))
}

#[instrument(skip(state, uri))]
pub async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(comment_id): Path<i64>,
) -> AppResult<StatusCode> {
    let operation = OperationDescriptor::new(method.as_str(), uri.path());
    audited(
        state.audit.clone(),
        &caller,
        operation,
        state.comments.delete_comment(&caller, comment_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
