/// Account directory operations.
///
/// The validation and hashing the original data model ran as ORM lifecycle
/// hooks run here explicitly: every field is re-checked before any write, and
/// the password is hashed immediately before the row is written. A failed
/// check aborts the whole write.

use sqlx::PgPool;
use uuid::Uuid;

use super::model::{NewUser, User, UserUpdate};
use super::repository;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, ValidationError};
use crate::validators::{normalize_email, validate_birth_date, validate_full_name};

pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, AppError> {
    let email = normalize_email(&new_user.email)?;
    let full_name = validate_full_name(&new_user.full_name)?;
    let birth_date = validate_birth_date(new_user.birth_date)?;

    if repository::find_by_email(pool, &email).await?.is_some() {
        return Err(ValidationError::EmailTaken.into());
    }

    let password_hash = hash_password(&new_user.password)?;

    let user = repository::insert(pool, &full_name, &email, birth_date, &password_hash).await?;

    tracing::info!(user_id = %user.id, "user account created");

    Ok(user)
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    repository::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AppError> {
    repository::list(pool).await
}

/// Applies a partial profile update. Changing the email to one owned by a
/// different account is rejected; a password change re-hashes.
pub async fn update_user(pool: &PgPool, id: Uuid, update: UserUpdate) -> Result<(), AppError> {
    let mut user = get_user(pool, id).await?;

    if let Some(email) = update.email {
        let email = normalize_email(&email)?;
        if email != user.email && repository::email_taken_by_other(pool, &email, id).await? {
            return Err(ValidationError::EmailTaken.into());
        }
        user.email = email;
    }

    if let Some(full_name) = update.full_name {
        user.full_name = validate_full_name(&full_name)?;
    }

    if let Some(birth_date) = update.birth_date {
        user.birth_date = validate_birth_date(birth_date)?;
    }

    if let Some(password) = update.password {
        user.password_hash = hash_password(&password)?;
    }

    repository::update(pool, &user).await?;

    tracing::info!(user_id = %user.id, "user account updated");

    Ok(())
}

/// Replaces the stored hash after verifying the old password.
pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let mut user = get_user(pool, id).await?;

    if !verify_password(old_password, &user.password_hash)? {
        return Err(ValidationError::WrongPassword.into());
    }

    user.password_hash = hash_password(new_password)?;
    repository::update(pool, &user).await?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(())
}
