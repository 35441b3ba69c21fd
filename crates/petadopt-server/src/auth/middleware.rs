use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::routes::AppState;

/// Reject the request unless it carries a valid session; the session user is
/// handed to the handler as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = state
        .sessions
        .read(jar.get(SESSION_COOKIE).map(|c| c.value()))
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
