use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::{UserRole, UserSummary};

/// Todo record in the database. `user_id` is the creator and never changes;
/// it is nullable only for legacy rows.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub weather: String,
    pub user_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

pub struct NewTodo<'a> {
    pub title: &'a str,
    pub contents: &'a str,
    pub weather: &'a str,
    pub user_id: i64,
}

/// A todo with its creator eagerly attached.
#[derive(Debug, Clone)]
pub struct TodoWithUser {
    pub todo: Todo,
    pub user: Option<UserSummary>,
}

/// Flat row of `todos LEFT JOIN users`.
#[derive(Debug, FromRow)]
pub struct TodoUserRow {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub weather: String,
    pub user_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
    pub user_email: Option<String>,
    pub user_role: Option<UserRole>,
}

impl From<TodoUserRow> for TodoWithUser {
    fn from(r: TodoUserRow) -> Self {
        let user = match (r.user_id, r.user_email, r.user_role) {
            (Some(id), Some(email), Some(role)) => Some(UserSummary { id, email, role }),
            _ => None,
        };
        Self {
            todo: Todo {
                id: r.id,
                title: r.title,
                contents: r.contents,
                weather: r.weather,
                user_id: r.user_id,
                created_at: r.created_at,
                modified_at: r.modified_at,
            },
            user,
        }
    }
}
