/// JWT claims carried by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Token kind, embedded in the `type` claim so a token can never be replayed
/// as the other kind even if the secrets were ever unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id as UUID string).
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Per-issuance id on refresh tokens; makes every refresh token string
    /// unique even for the same user within the same millisecond.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, kind: TokenKind, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        let jti = match kind {
            TokenKind::Access => None,
            TokenKind::Refresh => Some(Uuid::new_v4().to_string()),
        };

        Self {
            sub: user_id.to_string(),
            kind,
            jti,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Extracts the user id from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn access_claims_have_no_jti() {
        let claims = Claims::new(Uuid::new_v4(), TokenKind::Access, Duration::minutes(15));

        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.jti.is_none());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_claims_get_a_fresh_jti() {
        let user_id = Uuid::new_v4();
        let first = Claims::new(user_id, TokenKind::Refresh, Duration::days(7));
        let second = Claims::new(user_id, TokenKind::Refresh, Duration::days(7));

        assert!(first.jti.is_some());
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn user_id_roundtrips_through_sub() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, TokenKind::Access, Duration::minutes(15));

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn garbage_sub_is_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), TokenKind::Access, Duration::minutes(15));
        claims.sub = "not-a-uuid".to_string();

        assert!(claims.user_id().is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let claims = Claims::new(Uuid::new_v4(), TokenKind::Refresh, Duration::days(7));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["type"], "refresh");
        assert!(json["jti"].is_string());
    }
}
