use serde::{Deserialize, Serialize};

/// Request body for signup. `email` may be absent; the service rejects it.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default = "default_role")]
    pub user_role: String,
}

fn default_role() -> String {
    "USER".into()
}

/// Request body for signin.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after signup or signin.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub bearer_token: String,
}
