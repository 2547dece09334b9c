use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::{UserRole, UserSummary};

/// Links a todo to a co-administering user other than its creator.
#[derive(Debug, Clone, FromRow)]
pub struct Manager {
    pub id: i64,
    pub todo_id: i64,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerWithUser {
    pub id: i64,
    pub todo_id: i64,
    pub user: UserSummary,
}

#[derive(Debug, FromRow)]
pub struct ManagerUserRow {
    pub id: i64,
    pub todo_id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub user_role: UserRole,
}

impl From<ManagerUserRow> for ManagerWithUser {
    fn from(r: ManagerUserRow) -> Self {
        Self {
            id: r.id,
            todo_id: r.todo_id,
            user: UserSummary {
                id: r.user_id,
                email: r.user_email,
                role: r.user_role,
            },
        }
    }
}
