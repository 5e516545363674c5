//! Credential verifier: shape checks and constant-time equality

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use sv_shared::utils::validation;

use crate::domain::value_objects::Credentials;
use crate::errors::CredentialError;

/// Stateless credential checks
///
/// Every function is pure. Secrets are only ever compared through
/// fixed-length digests so comparison time does not depend on where the
/// inputs first differ or on the secret's length.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialVerifier;

impl CredentialVerifier {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_email(&self, email: &str) -> bool {
        validation::is_valid_email(email)
    }

    /// At least 8 characters with a digit, a lowercase and an uppercase letter
    pub fn validate_password(&self, password: &str) -> bool {
        validation::is_strong_password(password)
    }

    pub fn validate_phone(&self, phone: &str) -> bool {
        validation::is_valid_phone(phone)
    }

    /// Shape check of a pair about to be registered as reference credentials
    pub fn validate_credentials(&self, email: &str, password: &str) -> Result<(), CredentialError> {
        if validation::is_blank(email) || password.is_empty() {
            return Err(CredentialError::Empty);
        }
        if !self.validate_email(&self.sanitize(email)) {
            return Err(CredentialError::MalformedEmail);
        }
        if !self.validate_password(password) {
            return Err(CredentialError::WeakPassword);
        }
        Ok(())
    }

    /// Exact equality of both fields
    ///
    /// Both comparisons always run.
    pub fn compare_credentials(
        &self,
        submitted_email: &str,
        submitted_password: &str,
        reference_email: &str,
        reference_password: &str,
    ) -> bool {
        let email_matches = digest_eq(submitted_email, reference_email);
        let password_matches = digest_eq(submitted_password, reference_password);
        email_matches & password_matches
    }

    /// Trim and strip `< > \ " '`
    pub fn sanitize(&self, input: &str) -> String {
        validation::sanitize(input)
    }

    pub fn is_blank(&self, input: &str) -> bool {
        validation::is_blank(input)
    }

    pub fn mask_secret(&self, secret: &str) -> String {
        validation::mask_secret(secret)
    }

    /// Check a submitted pair against the reference pair
    ///
    /// The submitted e-mail is sanitised before the shape check and the
    /// comparison; the password is compared as given.
    pub fn check(
        &self,
        submitted: &Credentials,
        reference: &Credentials,
    ) -> Result<(), CredentialError> {
        let email = self.sanitize(&submitted.email);
        if email.is_empty() || submitted.password.is_empty() {
            return Err(CredentialError::Empty);
        }
        if !self.validate_email(&email) {
            return Err(CredentialError::MalformedEmail);
        }

        let matches = self.compare_credentials(
            &email,
            &submitted.password,
            &reference.email,
            &reference.password,
        );
        if !matches {
            return Err(CredentialError::Mismatch);
        }
        Ok(())
    }
}

fn digest_eq(left: &str, right: &str) -> bool {
    let left = Sha256::digest(left.as_bytes());
    let right = Sha256::digest(right.as_bytes());
    constant_time_eq(&left, &right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Credentials {
        Credentials::new("alice@example.com", "Secret123")
    }

    #[test]
    fn test_validate_email() {
        let verifier = CredentialVerifier::new();

        assert!(verifier.validate_email("alice@example.com"));
        assert!(verifier.validate_email("a.b+tag_1@sub-domain.example"));
        assert!(!verifier.validate_email("alice@"));
        assert!(!verifier.validate_email("alice example.com"));
        assert!(!verifier.validate_email("alice@exa mple.com"));
        assert!(!verifier.validate_email(""));
    }

    #[test]
    fn test_validate_password() {
        let verifier = CredentialVerifier::new();

        assert!(verifier.validate_password("Secret123"));
        assert!(!verifier.validate_password("Sec12"));
        assert!(!verifier.validate_password("secret123"));
        assert!(!verifier.validate_password("SECRET123"));
        assert!(!verifier.validate_password("SecretSecret"));
    }

    #[test]
    fn test_validate_phone() {
        let verifier = CredentialVerifier::new();

        assert!(verifier.validate_phone("+61412345678"));
        assert!(verifier.validate_phone("1234567"));
        assert!(!verifier.validate_phone("123456"));
        assert!(!verifier.validate_phone("+1234567890123456"));
        assert!(!verifier.validate_phone("+61 412 345 678"));
    }

    #[test]
    fn test_compare_credentials_requires_both_fields() {
        let verifier = CredentialVerifier::new();

        assert!(verifier.compare_credentials("a@b.c", "Pw123456", "a@b.c", "Pw123456"));
        assert!(!verifier.compare_credentials("a@b.c", "Pw123457", "a@b.c", "Pw123456"));
        assert!(!verifier.compare_credentials("x@b.c", "Pw123456", "a@b.c", "Pw123456"));
        assert!(!verifier.compare_credentials("a@b.c", "Pw1234567", "a@b.c", "Pw123456"));
    }

    #[test]
    fn test_sanitize_strips_markup() {
        let verifier = CredentialVerifier::new();

        assert_eq!(verifier.sanitize("  <b>\"bob\"</b>  "), "bbob/b");
        assert_eq!(verifier.sanitize("o'neil\\"), "oneil");
    }

    #[test]
    fn test_check_outcomes() {
        let verifier = CredentialVerifier::new();

        assert_eq!(verifier.check(&reference(), &reference()), Ok(()));
        assert_eq!(
            verifier.check(&Credentials::new("  alice@example.com ", "Secret123"), &reference()),
            Ok(())
        );
        assert_eq!(
            verifier.check(&Credentials::new("", ""), &reference()),
            Err(CredentialError::Empty)
        );
        assert_eq!(
            verifier.check(&Credentials::new("alice", "Secret123"), &reference()),
            Err(CredentialError::MalformedEmail)
        );
        assert_eq!(
            verifier.check(&Credentials::new("alice@example.com", "wrong"), &reference()),
            Err(CredentialError::Mismatch)
        );
    }

    #[test]
    fn test_validate_credentials() {
        let verifier = CredentialVerifier::new();

        assert_eq!(verifier.validate_credentials("alice@example.com", "Secret123"), Ok(()));
        assert_eq!(
            verifier.validate_credentials("alice@example.com", "secret"),
            Err(CredentialError::WeakPassword)
        );
        assert_eq!(
            verifier.validate_credentials("   ", "Secret123"),
            Err(CredentialError::Empty)
        );
    }

    #[test]
    fn test_mask_secret() {
        let verifier = CredentialVerifier::new();
        assert_eq!(verifier.mask_secret("Secret123"), "*********");
        assert!(verifier.is_blank(" \t"));
    }
}
