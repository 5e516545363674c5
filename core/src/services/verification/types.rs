//! Request types accepted by the verification orchestrator

use crate::domain::entities::SecurityToken;
use crate::domain::value_objects::{Credentials, RequestContext};

/// Identity of one verification flow: a subject and a purpose tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusKey {
    pub user_id: String,
    pub purpose: String,
}

impl StatusKey {
    /// # Panics
    ///
    /// Panics if `user_id` is empty.
    pub fn new(user_id: impl Into<String>, purpose: impl Into<String>) -> Self {
        let user_id = user_id.into();
        assert!(!user_id.is_empty(), "verification subject id must not be empty");
        Self {
            user_id,
            purpose: purpose.into(),
        }
    }
}

impl std::fmt::Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.purpose)
    }
}

/// Submitted e-mail/password pair for a subject
#[derive(Debug, Clone)]
pub struct CredentialAttempt {
    pub user_id: String,
    pub purpose: String,
    pub credentials: Credentials,
    pub context: RequestContext,
}

impl CredentialAttempt {
    pub fn new(
        user_id: impl Into<String>,
        purpose: impl Into<String>,
        credentials: Credentials,
        context: RequestContext,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            purpose: purpose.into(),
            credentials,
            context,
        }
    }
}

/// Data, its detached signature and the signer's public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEvidence {
    pub data: Vec<u8>,
    /// Standard Base64
    pub signature_b64: String,
    /// PEM encoded RSA public key
    pub public_key_pem: String,
}

/// Signature check for a subject
#[derive(Debug, Clone)]
pub struct SignatureRequest {
    pub user_id: String,
    pub purpose: String,
    pub evidence: SignatureEvidence,
    pub context: RequestContext,
}

impl SignatureRequest {
    pub fn new(
        user_id: impl Into<String>,
        purpose: impl Into<String>,
        data: impl Into<Vec<u8>>,
        signature_b64: impl Into<String>,
        public_key_pem: impl Into<String>,
        context: RequestContext,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            purpose: purpose.into(),
            evidence: SignatureEvidence {
                data: data.into(),
                signature_b64: signature_b64.into(),
                public_key_pem: public_key_pem.into(),
            },
            context,
        }
    }
}

/// Combined verification: every piece of evidence present must pass
///
/// A flow reaches `VERIFIED` only if the token is unexpired, active and
/// correctly signed, the credentials match and the signature verifies.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub user_id: String,
    pub purpose: String,
    pub context: RequestContext,
    pub token: Option<SecurityToken>,
    pub credentials: Option<Credentials>,
    pub signature: Option<SignatureEvidence>,
}

impl VerificationRequest {
    pub fn new(user_id: impl Into<String>, purpose: impl Into<String>, context: RequestContext) -> Self {
        Self {
            user_id: user_id.into(),
            purpose: purpose.into(),
            context,
            token: None,
            credentials: None,
            signature: None,
        }
    }

    pub fn with_token(mut self, token: SecurityToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_signature(
        mut self,
        data: impl Into<Vec<u8>>,
        signature_b64: impl Into<String>,
        public_key_pem: impl Into<String>,
    ) -> Self {
        self.signature = Some(SignatureEvidence {
            data: data.into(),
            signature_b64: signature_b64.into(),
            public_key_pem: public_key_pem.into(),
        });
        self
    }

    /// No evidence attached
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.credentials.is_none() && self.signature.is_none()
    }

    pub fn key(&self) -> StatusKey {
        StatusKey::new(self.user_id.clone(), self.purpose.clone())
    }
}

impl From<&CredentialAttempt> for VerificationRequest {
    fn from(attempt: &CredentialAttempt) -> Self {
        Self::new(&attempt.user_id, &attempt.purpose, attempt.context.clone())
            .with_credentials(attempt.credentials.clone())
    }
}

impl From<&SignatureRequest> for VerificationRequest {
    fn from(request: &SignatureRequest) -> Self {
        let mut verification =
            Self::new(&request.user_id, &request.purpose, request.context.clone());
        verification.signature = Some(request.evidence.clone());
        verification
    }
}
