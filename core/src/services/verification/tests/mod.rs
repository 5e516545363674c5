mod concurrency_tests;

use chrono::Duration;
use std::sync::Arc;

use crate::domain::entities::{purposes, SecurityToken};
use crate::domain::value_objects::{Credentials, RequestContext};
use crate::repositories::{
    InMemoryAttemptLog, InMemoryCredentialSource, InMemoryTokenStore, TokenStore,
};
use crate::services::signature::KeyPair;
use crate::services::token::{TokenIssuer, TokenIssuerConfig, TokenVerifier};
use crate::services::verification::{OrchestratorConfig, VerificationService};

const SIGNING_KEY_PEM: &str = include_str!("../../../../tests/fixtures/signing_key.pem");
const VERIFICATION_KEY_PEM: &str = include_str!("../../../../tests/fixtures/verification_key.pem");
const SUBSCRIPTION_CHANGE_SIGNATURE: &str =
    include_str!("../../../../tests/fixtures/subscription_change.sig");
const SUBSCRIPTION_CHANGE_DATA: &[u8] = b"subscription-change:plan=premium;user=u1";

type Service = VerificationService<InMemoryTokenStore, InMemoryAttemptLog, InMemoryCredentialSource>;

/// Service wired to in-memory collaborators with the fixture issuer key
struct Harness {
    service: Arc<Service>,
    tokens: Arc<InMemoryTokenStore>,
    attempts: Arc<InMemoryAttemptLog>,
    issuer: TokenIssuer<InMemoryTokenStore>,
}

impl Harness {
    async fn new() -> Self {
        let keys = KeyPair::from_pem_strings(SIGNING_KEY_PEM, VERIFICATION_KEY_PEM).unwrap();
        let tokens = Arc::new(InMemoryTokenStore::new());
        let attempts = Arc::new(InMemoryAttemptLog::new());
        let credentials = Arc::new(InMemoryCredentialSource::new());

        for user in ["u1", "u2", "u3"] {
            credentials
                .insert(user, Credentials::new(format!("{}@example.com", user), "Secret123"))
                .await;
        }

        let service = Arc::new(VerificationService::new(
            Arc::clone(&tokens),
            Arc::clone(&attempts),
            credentials,
            TokenVerifier::new(keys.verification.clone()),
            OrchestratorConfig::default(),
        ));
        let issuer = TokenIssuer::new(Arc::clone(&tokens), keys.signing, TokenIssuerConfig::default());

        Self {
            service,
            tokens,
            attempts,
            issuer,
        }
    }

    async fn issue(&self, user_id: &str) -> SecurityToken {
        self.issuer
            .issue(user_id, purposes::SUBSCRIPTION_CHANGE, &context())
            .await
            .unwrap()
    }

    /// A token of `user_id` that expired a minute ago, correctly signed
    async fn expired_token(&self, user_id: &str) -> SecurityToken {
        let keys = KeyPair::from_pem_strings(SIGNING_KEY_PEM, VERIFICATION_KEY_PEM).unwrap();
        let issued_at = chrono::Utc::now() - Duration::minutes(6);
        let token = SecurityToken::new(
            user_id,
            purposes::SUBSCRIPTION_CHANGE,
            issued_at,
            issued_at + Duration::minutes(5),
            &context(),
        );
        let signature = keys.signing.sign(&token.signing_payload()).unwrap();
        self.tokens.save(token.with_signature(signature)).await.unwrap()
    }
}

fn context() -> RequestContext {
    RequestContext::new("192.0.2.10", "Chrome 130").with_location("Sydney")
}

fn good_credentials(user_id: &str) -> Credentials {
    Credentials::new(format!("{}@example.com", user_id), "Secret123")
}
