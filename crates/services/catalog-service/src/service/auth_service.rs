//! Authentication service - Handles login.
//!
//! Unknown emails, wrong passwords and deactivated accounts all fail with the
//! same `InvalidCredentials` error, after the same amount of hashing work.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::cancel::cancellable;
use super::requests::{validate_request, AuthSession, LoginRequest};
use crate::repository::UserRepository;
use crate::security::{PasswordVerifier, TokenIssuer};
use common::{AppError, AppResult};
use domain::{UserResponse, TOKEN_TYPE_BEARER};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Well-formed Argon2id hash (default parameters) that matches no password.
/// Verifying against it costs as much as verifying a real one.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a bearer token.
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> AppResult<AuthSession>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIssuer>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenIssuer>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Argon2 is CPU-bound; keep it off the async workers.
    async fn verify_password(&self, plain_text: String, hash: String) -> AppResult<bool> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&plain_text, &hash))
            .await
            .map_err(|e| AppError::internal(format!("password verification task: {e}")))
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> AppResult<AuthSession> {
        validate_request(&request)?;

        let user = cancellable(cancel, self.users.get_by_email(&request.email)).await?;

        let hash = user
            .as_ref()
            .map_or(DUMMY_HASH, |u| u.password_hash())
            .to_string();
        let password_valid =
            cancellable(cancel, self.verify_password(request.password, hash)).await?;

        // Only succeed if the user exists, is active AND the password matches
        let user = match user {
            Some(user) if password_valid && user.is_active() => user,
            _ => {
                tracing::warn!("Rejected login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        let access_token = self.tokens.issue_token(&user)?;
        tracing::info!(user_id = %user.id(), "User logged in");

        Ok(AuthSession {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.tokens.expires_in(),
            user: UserResponse::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use crate::security::{MockPasswordVerifier, MockTokenIssuer};
    use domain::{User, UserRole};
    use mockall::predicate::eq;

    fn active_user() -> User {
        User::create(None, "seller@example.com", "$stored-hash", UserRole::Seller).unwrap()
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn authenticator(
        users: MockUserRepository,
        tokens: MockTokenIssuer,
        passwords: MockPasswordVerifier,
    ) -> Authenticator {
        Authenticator::new(Arc::new(users), Arc::new(tokens), Arc::new(passwords))
    }

    #[tokio::test]
    async fn test_login_success() {
        let user = active_user();
        let user_id = user.id();

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .with(eq("seller@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let mut passwords = MockPasswordVerifier::new();
        passwords
            .expect_verify()
            .withf(|plain, hash| plain == "right-password" && hash == "$stored-hash")
            .returning(|_, _| true);

        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue_token()
            .returning(|_| Ok("signed.jwt.token".to_string()));
        tokens.expect_expires_in().return_const(3600i64);

        let service = authenticator(users, tokens, passwords);
        let session = service
            .login(
                request("seller@example.com", "right-password"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(session.access_token, "signed.jwt.token");
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.id, user_id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let user = active_user();

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .with(eq("seller@example.com"))
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_get_by_email()
            .with(eq("nobody@example.com"))
            .returning(|_| Ok(None));

        let mut passwords = MockPasswordVerifier::new();
        passwords
            .expect_verify()
            .withf(|_, hash| hash == "$stored-hash")
            .times(1)
            .returning(|_, _| false);
        // The unknown email is still checked, against the dummy hash
        passwords
            .expect_verify()
            .withf(|_, hash| hash == DUMMY_HASH)
            .times(1)
            .returning(|_, _| false);

        let mut tokens = MockTokenIssuer::new();
        tokens.expect_issue_token().never();

        let service = authenticator(users, tokens, passwords);
        let cancel = CancellationToken::new();

        let wrong_password = service
            .login(request("seller@example.com", "wrong"), &cancel)
            .await
            .unwrap_err();
        let unknown_email = service
            .login(request("nobody@example.com", "wrong"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_inactive_user_rejected() {
        let stored = active_user();
        let inactive = User::restore(
            stored.id(),
            stored.email(),
            stored.password_hash(),
            stored.role(),
            false,
        )
        .unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .returning(move |_| Ok(Some(inactive.clone())));
        let mut passwords = MockPasswordVerifier::new();
        passwords.expect_verify().returning(|_, _| true);

        let service = authenticator(users, MockTokenIssuer::new(), passwords);
        let err = service
            .login(request("seller@example.com", "right"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_malformed_email_never_reaches_storage() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_email().never();

        let service = authenticator(users, MockTokenIssuer::new(), MockPasswordVerifier::new());
        let err = service
            .login(request("no-at-sign", "pw"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_cancelled_login() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_email().returning(|_| Ok(None));

        let service = authenticator(users, MockTokenIssuer::new(), MockPasswordVerifier::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .login(request("seller@example.com", "pw"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }
}
