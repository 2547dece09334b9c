use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{comments::repo_types::CommentWithUser, users::dto::UserResponse};

/// `contents` may be absent; only absence is rejected, an empty string is kept.
#[derive(Debug, Deserialize)]
pub struct CommentSaveRequest {
    #[serde(default)]
    pub contents: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub contents: String,
    pub user: UserResponse,
    pub created_at: OffsetDateTime,
}

impl From<CommentWithUser> for CommentResponse {
    fn from(c: CommentWithUser) -> Self {
        Self {
            id: c.id,
            contents: c.contents,
            user: c.user.into(),
            created_at: c.created_at,
        }
    }
}
