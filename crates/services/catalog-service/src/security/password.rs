use super::PasswordVerifier;
use domain::Password;

/// Argon2 verification through the domain `Password` value object.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl PasswordVerifier for Argon2Verifier {
    fn verify(&self, plain_text: &str, stored_hash: &str) -> bool {
        Password::from_hash(stored_hash).verify(plain_text)
    }
}
