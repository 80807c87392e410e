//! Session management.
//!
//! ARCHITECTURE
//! ============
//! Sessions are issued by the identity service that owns signup and login;
//! this server validates and deletes them. The raw token only ever lives in
//! the client's cookie. The `sessions` table is keyed by its SHA-256 hex
//! digest, so a database read never yields a usable credential.
//!
//! The one place this server mints a session itself is the development
//! bootstrap behind `DEV_AUTH_BYPASS`.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Fixed id of the development user created by [`create_dev_session`].
pub const DEV_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_de01);
const DEV_USER_NAME: &str = "Dev User";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 hex digest stored in place of the raw token.
#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// User row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

/// Create a session for the given user, returning the raw token.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token_hash, user_id) VALUES ($1, $2)")
        .bind(hash_token(&token))
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
///
/// # Errors
///
/// Returns a database error if the lookup fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.name, u.email
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token_hash = $1 AND s.expires_at > now()",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), name: r.get("name"), email: r.get("email") }))
}

/// Delete a session by raw token.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

/// Upsert the development user and open a session for it.
///
/// # Errors
///
/// Returns a database error if either write fails.
pub async fn create_dev_session(pool: &PgPool) -> Result<(SessionUser, String), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name) VALUES ($1, $2)
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
    )
    .bind(DEV_USER_ID)
    .bind(DEV_USER_NAME)
    .execute(pool)
    .await?;

    let token = create_session(pool, DEV_USER_ID).await?;
    let user = SessionUser { id: DEV_USER_ID, name: DEV_USER_NAME.to_owned(), email: None };
    Ok((user, token))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
