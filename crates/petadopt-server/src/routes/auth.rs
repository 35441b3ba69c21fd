use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::auth::accounts;
use crate::auth::session::SESSION_COOKIE;
use crate::error::AppResult;
use crate::models::SessionUser;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let user = accounts::signup(&state.db, &body.name, &body.email, &body.password)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = accounts::login(&state.db, &body.email, &body.password)?;
    let cookie = state.sessions.issue(&user)?;

    tracing::info!("Login successful for {}", user.email);
    Ok((
        jar.add(cookie),
        Json(json!({ "message": "Login successful", "user": user })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(state.sessions.revoke()),
        Json(json!({ "message": "Logout successful" })),
    )
}

/// GET /api/auth/session. Anonymous callers get `{"user": null}`.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Json<serde_json::Value> {
    let user = state
        .sessions
        .read(jar.get(SESSION_COOKIE).map(|c| c.value()));
    Json(json!({ "user": user }))
}

/// GET /api/profile
pub async fn profile(Extension(user): Extension<SessionUser>) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}
