//! Signed session cookies.
//!
//! The cookie value is `<payload>.<signature>` where the payload is the
//! base64url JSON of the session user plus an absolute expiry, and the
//! signature is the hex HMAC-SHA256 of the payload text.

use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{AppError, AppResult};
use crate::models::SessionUser;

pub const SESSION_COOKIE: &str = "user-session";
pub const SESSION_DURATION_DAYS: i64 = 7;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    name: String,
    email: String,
    exp: i64,
}

#[derive(Clone)]
pub struct SessionSigner {
    key: Vec<u8>,
    secure: bool,
}

impl SessionSigner {
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            secure,
        }
    }

    /// Build the cookie that starts an authenticated session.
    pub fn issue(&self, user: &SessionUser) -> AppResult<Cookie<'static>> {
        let exp = (Utc::now() + Duration::days(SESSION_DURATION_DAYS)).timestamp();
        let value = self.encode(user, exp)?;

        Ok(Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .max_age(time::Duration::days(SESSION_DURATION_DAYS))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build())
    }

    /// Decode a cookie value. Anything missing, tampered with, malformed or
    /// expired reads as "not logged in".
    pub fn read(&self, value: Option<&str>) -> Option<SessionUser> {
        let (payload, signature) = value?.split_once('.')?;

        let signature = hex::decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&json).ok()?;
        if claims.exp <= Utc::now().timestamp() {
            return None;
        }

        Some(SessionUser {
            id: claims.id,
            name: claims.name,
            email: claims.email,
        })
    }

    /// Build the cookie that ends the session: empty value, expired at the epoch.
    pub fn revoke(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .max_age(time::Duration::ZERO)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }

    fn encode(&self, user: &SessionUser, exp: i64) -> AppResult<String> {
        let claims = Claims {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            exp,
        };
        let json = serde_json::to_vec(&claims)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(format!("Invalid session key: {e}")))
    }
}
