/// SQL access for the `user_account` table.
///
/// Callers go through `users::service`, which owns validation and hashing;
/// nothing here inspects field contents.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::model::User;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, full_name, email, birth_date, password_hash, created_at, updated_at";

pub async fn insert(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    birth_date: NaiveDate,
    password_hash: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO user_account (id, full_name, email, birth_date, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(birth_date)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user_account WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user_account WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user_account ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Whether `email` already belongs to an account other than `user_id`.
pub async fn email_taken_by_other(
    pool: &PgPool,
    email: &str,
    user_id: Uuid,
) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM user_account WHERE email = $1 AND id <> $2)",
    )
    .bind(email)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Writes back a full, already-validated row.
pub async fn update(pool: &PgPool, user: &User) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE user_account
        SET full_name = $1, email = $2, birth_date = $3, password_hash = $4, updated_at = $5
        WHERE id = $6
        "#,
    )
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(user.birth_date)
    .bind(&user.password_hash)
    .bind(Utc::now())
    .bind(user.id)
    .execute(pool)
    .await?;

    Ok(())
}
