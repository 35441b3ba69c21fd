use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::auth::password;
use crate::db::{users, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{SessionUser, User, UserPublic};

pub const NAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Create an account. The email is checked up front so the common duplicate
/// case never reaches the hasher; the unique index catches the rest.
pub fn signup(pool: &DbPool, name: &str, email: &str, password: &str) -> AppResult<UserPublic> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err(AppError::validation("name", "Please enter your name"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(AppError::validation(
            "name",
            format!("Name cannot be more than {NAME_MAX_CHARS} characters"),
        ));
    }
    if email.is_empty() {
        return Err(AppError::validation("email", "Please enter your email"));
    }
    if !is_valid_email(email) {
        return Err(AppError::validation("email", "Please provide a valid email"));
    }
    if password.is_empty() {
        return Err(AppError::validation("password", "Please enter your password"));
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(AppError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters long"),
        ));
    }

    if users::find_by_email(pool, email)?.is_some() {
        tracing::info!("Signup rejected, account exists for {email}");
        return Err(AppError::DuplicateEmail);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password::hash_password(password)?,
        created_at: chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    };
    users::insert(pool, &user)?;

    tracing::info!("Created account {} for {}", user.id, user.email);
    Ok(user.into())
}

/// Check credentials. Unknown email and wrong password fail identically.
pub fn login(pool: &DbPool, email: &str, password: &str) -> AppResult<SessionUser> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let Some(user) = users::find_by_email(pool, email)? else {
        tracing::debug!("Login failed: no account for {email}");
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(password, &user.password_hash) {
        tracing::debug!("Login failed: password mismatch for {email}");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user.into())
}
