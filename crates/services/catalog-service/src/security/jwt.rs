//! HS256 JWT issuer.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TokenIssuer;
use common::{AppError, AppResult, JwtConfig};
use domain::{User, SECONDS_PER_HOUR};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signs tokens with a shared secret.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiration_hours: config.expiration_hours,
        }
    }

    fn lifetime_seconds(&self) -> Option<i64> {
        self.expiration_hours.checked_mul(SECONDS_PER_HOUR)
    }

    /// Verify a token and extract its claims.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = self
            .lifetime_seconds()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::internal("Token expiration is out of range"))?;

        let claims = Claims {
            sub: user.id(),
            email: user.email().to_string(),
            role: user.role().as_str().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    fn expires_in(&self) -> i64 {
        self.lifetime_seconds().unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::UserRole;

    fn issuer(secret: &str) -> JwtIssuer {
        JwtIssuer::new(&JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 2,
        })
    }

    #[test]
    fn test_issued_token_carries_identity() {
        let issuer = issuer("a-secret-that-is-long-enough-for-tests");
        let user = User::create(None, "admin@example.com", "$hash", UserRole::Admin).unwrap();

        let token = issuer.issue_token(&user).unwrap();
        let claims = issuer.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id());
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "ADMIN");
        assert_eq!(claims.exp - claims.iat, 2 * SECONDS_PER_HOUR);
        assert_eq!(issuer.expires_in(), 7200);
    }

    #[test]
    fn test_unrepresentable_lifetime_is_an_error() {
        let issuer = JwtIssuer::new(&JwtConfig {
            secret: "a-secret-that-is-long-enough-for-tests".to_string(),
            expiration_hours: 10_000_000_000,
        });
        let user = User::create(None, "a@example.com", "$hash", UserRole::Customer).unwrap();

        assert!(matches!(issuer.issue_token(&user), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let user = User::create(None, "a@example.com", "$hash", UserRole::Customer).unwrap();
        let token = issuer("first-secret-first-secret-first-secret")
            .issue_token(&user)
            .unwrap();

        assert!(issuer("other-secret-other-secret-other-secret")
            .verify_token(&token)
            .is_err());
    }
}
