//! Authentication route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use crate::error::{Result, set_sentry_user};
use crate::services::auth::{Credentials, Registration};
use crate::state::AppState;

/// Acknowledgement returned by registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
}

/// Token returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: &'static str,
}

/// Register a new account.
///
/// POST /register
///
/// # Errors
///
/// Returns 400 for a malformed body, 409 if the email is taken, and 500 on
/// hashing or storage failure.
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(registration) = payload?;

    state.auth().register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
        }),
    ))
}

/// Log in with email and password.
///
/// POST /login
///
/// # Errors
///
/// Returns 400 for a malformed body and 401 for unknown email or wrong
/// password alike.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(credentials) = payload?;

    let outcome = state.auth().login(credentials).await?;
    set_sentry_user(&outcome.user.id);

    Ok(Json(LoginResponse {
        token: outcome.token.expose().to_owned(),
        message: "Login successful",
    }))
}
