use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::{UserRole, UserSummary};

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub contents: String,
    pub todo_id: i64,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}

pub struct NewComment<'a> {
    pub contents: &'a str,
    pub todo_id: i64,
    pub user_id: i64,
}

/// A comment with its author eagerly attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentWithUser {
    pub id: i64,
    pub contents: String,
    pub todo_id: i64,
    pub user: UserSummary,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct CommentUserRow {
    pub id: i64,
    pub contents: String,
    pub todo_id: i64,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub user_email: String,
    pub user_role: UserRole,
}

impl From<CommentUserRow> for CommentWithUser {
    fn from(r: CommentUserRow) -> Self {
        Self {
            id: r.id,
            contents: r.contents,
            todo_id: r.todo_id,
            user: UserSummary {
                id: r.user_id,
                email: r.user_email,
                role: r.user_role,
            },
            created_at: r.created_at,
        }
    }
}
