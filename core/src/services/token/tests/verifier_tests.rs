//! Tests for TokenVerifier

use chrono::{Duration, Utc};

use super::{key_pair, FOREIGN_VERIFICATION_KEY_PEM};
use crate::domain::entities::{purposes, SecurityToken};
use crate::domain::value_objects::RequestContext;
use crate::errors::TokenError;
use crate::services::signature::VerificationKey;
use crate::services::token::TokenVerifier;

fn signed_token(issued_offset: Duration, ttl: Duration) -> SecurityToken {
    let pair = key_pair();
    let issued_at = Utc::now() + issued_offset;
    let token = SecurityToken::new(
        "u1",
        purposes::SUBSCRIPTION_CHANGE,
        issued_at,
        issued_at + ttl,
        &RequestContext::new("10.1.1.1", "iPhone"),
    );
    let signature = pair.signing.sign(&token.signing_payload()).unwrap();
    token.with_signature(signature)
}

#[test]
fn test_valid_token_verifies() {
    let verifier = TokenVerifier::new(key_pair().verification);
    let token = signed_token(Duration::zero(), Duration::minutes(5));

    assert!(verifier.verify(&token));
    assert_eq!(verifier.check(&token, Utc::now()), Ok(()));
}

#[test]
fn test_expired_token_fails_before_signature_check() {
    let verifier = TokenVerifier::new(key_pair().verification);
    let mut token = signed_token(Duration::minutes(-10), Duration::minutes(5));
    token.signature = Some("garbage".to_string());

    assert!(!verifier.verify(&token));
    assert_eq!(verifier.check(&token, Utc::now()), Err(TokenError::Expired));
}

#[test]
fn test_expiry_evaluated_at_given_instant() {
    let verifier = TokenVerifier::new(key_pair().verification);
    let token = signed_token(Duration::zero(), Duration::minutes(5));

    assert_eq!(verifier.check(&token, token.expires_at), Err(TokenError::Expired));
    assert_eq!(
        verifier.check(&token, token.expires_at - Duration::seconds(1)),
        Ok(())
    );
}

#[test]
fn test_tampered_payload_fails() {
    let verifier = TokenVerifier::new(key_pair().verification);
    let mut token = signed_token(Duration::zero(), Duration::minutes(5));
    token.user_id = "u2".to_string();

    assert_eq!(verifier.check(&token, Utc::now()), Err(TokenError::InvalidSignature));
}

#[test]
fn test_unsigned_or_foreign_signed_token_fails() {
    let token = signed_token(Duration::zero(), Duration::minutes(5));

    let mut unsigned = token.clone();
    unsigned.signature = None;
    let verifier = TokenVerifier::new(key_pair().verification);
    assert_eq!(verifier.check(&unsigned, Utc::now()), Err(TokenError::InvalidSignature));

    let foreign = TokenVerifier::new(VerificationKey::from_pem(FOREIGN_VERIFICATION_KEY_PEM).unwrap());
    assert!(!foreign.verify(&token));
}

#[test]
fn test_time_until_expiry_and_refresh() {
    let verifier = TokenVerifier::new(key_pair().verification);
    let fresh = signed_token(Duration::zero(), Duration::minutes(5));
    let expired = signed_token(Duration::minutes(-10), Duration::minutes(5));

    let remaining = verifier.time_until_expiry(&fresh);
    assert!(remaining > Duration::minutes(4));
    assert!(remaining <= Duration::minutes(5));
    assert!(!verifier.needs_refresh(&fresh, Duration::seconds(60)));

    assert_eq!(verifier.time_until_expiry(&expired), Duration::zero());
    assert!(verifier.needs_refresh(&expired, Duration::seconds(60)));
}
