/// Refresh-token persistence.
///
/// Stored tokens are the exact opaque strings handed to clients, grouped by
/// `family_id` into rotation chains; lookups are exact-match on the token
/// string. Revocation is a flag flip so a replayed token can still be
/// recognized and traced back to its family.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub is_revoked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// Persists a freshly issued refresh token, unrevoked.
pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    family_id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO auth_refresh_token
            (id, token, user_id, family_id, is_revoked, expires_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $6, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(token)
    .bind(user_id)
    .bind(family_id)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Looks up a stored record by the exact token string.
pub async fn find_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, AppError> {
    let record = sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        SELECT id, token, user_id, family_id, is_revoked, expires_at, created_at, updated_at
        FROM auth_refresh_token
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Marks a single record revoked (rotation step).
pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE auth_refresh_token
        SET is_revoked = TRUE, updated_at = $1
        WHERE id = $2
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Revokes every record in a rotation family (logout, reuse detection).
pub async fn revoke_family(pool: &PgPool, family_id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE auth_refresh_token
        SET is_revoked = TRUE, updated_at = $1
        WHERE family_id = $2 AND is_revoked = FALSE
        "#,
    )
    .bind(Utc::now())
    .bind(family_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// All records for a user, most-future expiry first. The cleanup sweep
/// depends on this exact ordering.
pub async fn all_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<RefreshTokenRecord>, AppError> {
    let records = sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        SELECT id, token, user_id, family_id, is_revoked, expires_at, created_at, updated_at
        FROM auth_refresh_token
        WHERE user_id = $1
        ORDER BY expires_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn delete_many(pool: &PgPool, ids: &[Uuid]) -> Result<(), AppError> {
    sqlx::query("DELETE FROM auth_refresh_token WHERE id = ANY($1)")
        .bind(ids.to_vec())
        .execute(pool)
        .await?;

    Ok(())
}

/// Decides which rows the cleanup sweep deletes.
///
/// `records` must already be ordered by `expires_at` descending. Walking
/// forward, the first `max_active` unrevoked, unexpired records are kept;
/// every revoked, expired, or over-cap record is marked for deletion. The
/// walk direction means the longest-lived sessions survive the cap and the
/// token closest to expiry is retired last.
pub fn select_tokens_to_delete(
    records: &[RefreshTokenRecord],
    max_active: i64,
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    let mut active: i64 = 0;
    let mut doomed = Vec::new();

    for record in records {
        if active >= max_active || !record.is_active(now) {
            doomed.push(record.id);
        } else {
            active += 1;
        }
    }

    doomed
}
