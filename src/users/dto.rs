use serde::Serialize;

use crate::users::repo_types::{User, UserSummary};

/// Public part of a user returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

impl From<UserSummary> for UserResponse {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}
