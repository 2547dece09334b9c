use serde::{Deserialize, Serialize};

use crate::users::repo_types::UserRole;

/// JWT payload identifying the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,       // user ID
    pub email: String,  // email at issue time
    pub role: UserRole, // role fixed at signup
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
}
