use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{todos::repo_types::TodoWithUser, users::dto::UserResponse};

#[derive(Debug, Deserialize)]
pub struct TodoSaveRequest {
    pub title: String,
    #[serde(default)]
    pub contents: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub weather: String,
    pub user: Option<UserResponse>,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
}

impl From<TodoWithUser> for TodoResponse {
    fn from(t: TodoWithUser) -> Self {
        Self {
            id: t.todo.id,
            title: t.todo.title,
            contents: t.todo.contents,
            weather: t.todo.weather,
            user: t.user.map(Into::into),
            created_at: t.todo.created_at,
            modified_at: t.todo.modified_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}
