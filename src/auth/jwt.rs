/// Signed-token minting and verification.
///
/// Access and refresh tokens are HS256 JWTs signed with separate secrets;
/// verification checks signature, expiry, and the declared token kind.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, TokenKind};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

/// Mints a short-lived access token for a user. Stateless, nothing persisted.
pub fn generate_access_token(user_id: Uuid, auth: &AuthSettings) -> Result<String, AppError> {
    let claims = Claims::new(user_id, TokenKind::Access, auth.access_ttl()?);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.access_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Mints a refresh token for a user; the embedded `jti` makes each issuance
/// a distinct string.
pub fn generate_refresh_token(user_id: Uuid, auth: &AuthSettings) -> Result<String, AppError> {
    let claims = Claims::new(user_id, TokenKind::Refresh, auth.refresh_ttl()?);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.refresh_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

pub fn verify_access_token(token: &str, auth: &AuthSettings) -> Result<Claims, AppError> {
    verify(token, &auth.access_token_secret, TokenKind::Access)
}

pub fn verify_refresh_token(token: &str, auth: &AuthSettings) -> Result<Claims, AppError> {
    verify(token, &auth.refresh_token_secret, TokenKind::Refresh)
}

fn verify(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("token validation error: {}", e);
        AppError::Auth(AuthError::TokenInvalid)
    })?;

    if claims.kind != expected {
        return Err(AppError::Auth(AuthError::TokenInvalid));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> AuthSettings {
        AuthSettings {
            access_token_secret: "access-secret-for-tests-only-32-chars".to_string(),
            refresh_token_secret: "refresh-secret-for-tests-only-32-chars".to_string(),
            access_token_expiry: "15m".to_string(),
            refresh_token_expiry: "7d".to_string(),
            max_refresh_tokens: 5,
        }
    }

    #[test]
    fn access_token_roundtrips() {
        let auth = test_settings();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, &auth).unwrap();
        let claims = verify_access_token(&token, &auth).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_roundtrips_with_jti() {
        let auth = test_settings();
        let user_id = Uuid::new_v4();

        let token = generate_refresh_token(user_id, &auth).unwrap();
        let claims = verify_refresh_token(&token, &auth).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn consecutive_refresh_tokens_differ() {
        let auth = test_settings();
        let user_id = Uuid::new_v4();

        let first = generate_refresh_token(user_id, &auth).unwrap();
        let second = generate_refresh_token(user_id, &auth).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = test_settings();
        let token = generate_access_token(Uuid::new_v4(), &auth).unwrap();
        let tampered = format!("{}X", token);

        assert!(verify_access_token(&tampered, &auth).is_err());
    }

    #[test]
    fn tokens_do_not_verify_under_the_other_secret() {
        let auth = test_settings();
        let user_id = Uuid::new_v4();

        let access = generate_access_token(user_id, &auth).unwrap();
        let refresh = generate_refresh_token(user_id, &auth).unwrap();

        assert!(verify_refresh_token(&access, &auth).is_err());
        assert!(verify_access_token(&refresh, &auth).is_err());
    }

    #[test]
    fn kind_mismatch_is_rejected_even_with_matching_secret() {
        let mut auth = test_settings();
        auth.refresh_token_secret = auth.access_token_secret.clone();

        let access = generate_access_token(Uuid::new_v4(), &auth).unwrap();

        assert!(verify_refresh_token(&access, &auth).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = test_settings();

        // An access token whose expiry is far enough in the past to clear
        // the decoder's default leeway.
        let claims = Claims::new(
            Uuid::new_v4(),
            TokenKind::Access,
            chrono::Duration::minutes(-5),
        );
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.access_token_secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_access_token(&token, &auth).is_err());
    }
}
