use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;

use crate::error::AuthError;
use crate::models::auth::SigninRequest;
use crate::routes::error::ApiError;
use crate::routes::extractor::{ApiJson, AuthSession};
use crate::state::AppState;

pub async fn signin(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SigninRequest>,
) -> Result<Json<Value>, ApiError> {
    // Validasi input
    if payload.id.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("ID dan password wajib diisi."));
    }

    let user = state
        .identity
        .authenticate(payload.id.trim(), &payload.password)
        .ok_or(AuthError::InvalidCredentials)?;

    let token = state.sessions.open(user.clone()).await;
    info!(user_id = %user.id, "signed in");

    Ok(Json(json!({
        "status": "success",
        "message": "Login berhasil!",
        "token": token,
        "user": user
    })))
}

pub async fn signout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let user = state.sessions.close(&session.token).await?;
    info!(user_id = %user.id, "signed out");

    Ok(Json(json!({
        "status": "success",
        "message": "Logout berhasil."
    })))
}

// Identitas sesi yang sedang aktif
pub async fn me(session: AuthSession) -> Json<Value> {
    Json(json!({
        "status": "success",
        "user": session.user
    }))
}
