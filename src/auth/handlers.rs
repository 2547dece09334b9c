use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, SigninRequest, SignupRequest},
        jwt::bearer,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Blank or missing emails go through so the service reports them.
    if let Some(email) = payload.email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !is_valid_email(email) {
            warn!(email, "invalid email");
            return Err(AppError::validation("Invalid email"));
        }
    }

    let token = state
        .auth
        .signup(
            payload.email.as_deref(),
            &payload.password,
            &payload.user_role,
        )
        .await?;
    Ok(Json(AuthResponse {
        bearer_token: bearer(&token),
    }))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token = state.auth.signin(&payload.email, &payload.password).await?;
    Ok(Json(AuthResponse {
        bearer_token: bearer(&token),
    }))
}
