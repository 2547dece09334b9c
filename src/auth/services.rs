use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{jwt::JwtKeys, password::PasswordEncoder},
    error::{AppError, AppResult},
    users::{
        repo::{DuplicateEmail, UserStore},
        repo_types::{NewUser, UserRole},
    },
};

/// Validates credentials and issues identity tokens.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoder: Arc<dyn PasswordEncoder>,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        encoder: Arc<dyn PasswordEncoder>,
        keys: Arc<JwtKeys>,
    ) -> Self {
        Self {
            users,
            encoder,
            keys,
        }
    }

    /// Registers a user and returns a signed token for it.
    ///
    /// Every precondition is checked before the password is hashed, so a
    /// rejected signup never pays for hashing.
    pub async fn signup(
        &self,
        email: Option<&str>,
        password: &str,
        requested_role: &str,
    ) -> AppResult<String> {
        let email = match email {
            Some(e) if !e.trim().is_empty() => e,
            _ => {
                warn!("signup without email");
                return Err(AppError::validation("Email is null or empty"));
            }
        };

        let role: UserRole = requested_role.parse().map_err(|e: String| {
            warn!(error = %e, "signup with unknown role");
            AppError::validation("Invalid user role")
        })?;

        if password.is_empty() {
            warn!(email, "signup without password");
            return Err(AppError::validation("Password is required"));
        }

        if self.users.exists_by_email(email).await? {
            warn!(email, "email already registered");
            return Err(AppError::conflict("Email already registered"));
        }

        let hash = self.encoder.encode(password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash: &hash,
                role,
            })
            .await
            .map_err(|e| {
                if e.is::<DuplicateEmail>() {
                    // lost a race with a concurrent signup for the same email
                    warn!(email, "email registered concurrently");
                    AppError::conflict("Email already registered")
                } else {
                    AppError::from(e)
                }
            })?;

        let token = self.keys.sign(user.id, &user.email, user.role)?;
        info!(user_id = user.id, role = %user.role, "user signed up");
        Ok(token)
    }

    /// Checks an email/password pair and returns a token for the existing user.
    pub async fn signin(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            warn!(email, "signin unknown email");
            AppError::not_found("Account not registered")
        })?;

        if !self.encoder.matches(password, &user.password_hash)? {
            warn!(user_id = user.id, "signin invalid password");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let token = self.keys.sign(user.id, &user.email, user.role)?;
        info!(user_id = user.id, "user signed in");
        Ok(token)
    }
}
