use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::User;

pub fn find_by_email(pool: &DbPool, email: &str) -> AppResult<Option<User>> {
    let conn = pool.get()?;

    let result = conn.query_row(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?1",
        rusqlite::params![email],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Insert a new account. A concurrent signup that wins the race on the same
/// email surfaces here as a constraint violation.
pub fn insert(pool: &DbPool, user: &User) -> AppResult<()> {
    let conn = pool.get()?;

    let result = conn.execute(
        "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.created_at
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::DuplicateEmail)
        }
        Err(e) => Err(AppError::Database(e)),
    }
}

pub fn count(pool: &DbPool) -> AppResult<i64> {
    let conn = pool.get()?;
    let n = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(n)
}
