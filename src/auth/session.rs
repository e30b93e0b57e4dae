/// Session rotation engine.
///
/// Issues access/refresh pairs, rotates the refresh token on every use,
/// revokes a whole family when a revoked token is replayed, and prunes stale
/// records synchronously on every login and refresh.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, verify_refresh_token};
use crate::auth::password::verify_password;
use crate::auth::token_store;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::users::model::User;
use crate::users::repository as users_repo;

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: User,
}

/// Authenticates a user and opens a new session family.
///
/// Unknown email and wrong password fail identically so the endpoint cannot
/// be used to enumerate accounts.
pub async fn log_in(
    pool: &PgPool,
    auth: &AuthSettings,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    let email = email.trim().to_lowercase();

    let user = users_repo::find_by_email(pool, &email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let family_id = Uuid::new_v4();
    let access_token = generate_access_token(user.id, auth)?;
    let refresh_token = generate_refresh_token(user.id, auth)?;

    clean_up_old_tokens(pool, user.id, auth.max_refresh_tokens - 1).await?;

    let expires_at = Utc::now() + auth.refresh_ttl()?;
    token_store::insert(pool, user.id, family_id, &refresh_token, expires_at).await?;

    tracing::info!(user_id = %user.id, family_id = %family_id, "session opened");

    Ok(LoginOutcome {
        tokens: TokenPair {
            access_token,
            refresh_token,
        },
        user,
    })
}

/// Rotates a refresh token: the presented record is revoked and a replacement
/// is issued in the same family.
///
/// Fail-closed: any failure that is not already an authentication error
/// leaves as a generic invalid-token rejection, so nothing internal leaks on
/// this path.
pub async fn refresh(
    pool: &PgPool,
    auth: &AuthSettings,
    presented: &str,
) -> Result<TokenPair, AppError> {
    match rotate(pool, auth, presented).await {
        Ok(pair) => Ok(pair),
        Err(AppError::Auth(e)) => Err(AppError::Auth(e)),
        Err(err) => {
            tracing::warn!(error = %err, "refresh failed, rejecting token");
            Err(AppError::Auth(AuthError::TokenInvalid))
        }
    }
}

async fn rotate(pool: &PgPool, auth: &AuthSettings, presented: &str) -> Result<TokenPair, AppError> {
    verify_refresh_token(presented, auth)?;

    let stored = token_store::find_by_token(pool, presented)
        .await?
        .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

    if stored.is_revoked {
        // A revoked token coming back means the legitimate chain already
        // advanced past it, or it was stolen. Either way the whole family is
        // suspect.
        tracing::warn!(
            user_id = %stored.user_id,
            family_id = %stored.family_id,
            "refresh token reuse detected, revoking family"
        );
        token_store::revoke_family(pool, stored.family_id).await?;
        return Err(AppError::Auth(AuthError::TokenInvalid));
    }

    let user = users_repo::find_by_id(pool, stored.user_id)
        .await?
        .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

    let access_token = generate_access_token(user.id, auth)?;
    let refresh_token = generate_refresh_token(user.id, auth)?;

    token_store::revoke(pool, stored.id).await?;

    clean_up_old_tokens(pool, user.id, auth.max_refresh_tokens - 1).await?;

    let expires_at = Utc::now() + auth.refresh_ttl()?;
    token_store::insert(pool, user.id, stored.family_id, &refresh_token, expires_at).await?;

    tracing::info!(user_id = %user.id, family_id = %stored.family_id, "session rotated");

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Revokes the whole family behind `presented`, if it is known. Missing and
/// unknown tokens are ignored so logout is idempotent.
pub async fn log_out(pool: &PgPool, presented: Option<&str>) -> Result<(), AppError> {
    let Some(presented) = presented else {
        return Ok(());
    };
    if presented.is_empty() {
        return Ok(());
    }

    if let Some(stored) = token_store::find_by_token(pool, presented).await? {
        token_store::revoke_family(pool, stored.family_id).await?;
        tracing::info!(
            user_id = %stored.user_id,
            family_id = %stored.family_id,
            "session family revoked on logout"
        );
    }

    Ok(())
}

/// Caps live sessions per user and sweeps dead rows in the same pass.
///
/// Runs on every login and refresh rather than on a timer; the retention
/// decision itself is `token_store::select_tokens_to_delete`.
pub async fn clean_up_old_tokens(
    pool: &PgPool,
    user_id: Uuid,
    max_tokens: i64,
) -> Result<(), AppError> {
    let records = token_store::all_for_user(pool, user_id).await?;
    let doomed = token_store::select_tokens_to_delete(&records, max_tokens, Utc::now());

    if !doomed.is_empty() {
        tracing::debug!(user_id = %user_id, deleted = doomed.len(), "pruned refresh tokens");
        token_store::delete_many(pool, &doomed).await?;
    }

    Ok(())
}
