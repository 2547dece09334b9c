use serde::{Deserialize, Serialize};

use crate::{managers::repo_types::ManagerWithUser, users::dto::UserResponse};

#[derive(Debug, Deserialize)]
pub struct ManagerSaveRequest {
    pub manager_user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ManagerResponse {
    pub id: i64,
    pub user: UserResponse,
}

impl From<ManagerWithUser> for ManagerResponse {
    fn from(m: ManagerWithUser) -> Self {
        Self {
            id: m.id,
            user: m.user.into(),
        }
    }
}
