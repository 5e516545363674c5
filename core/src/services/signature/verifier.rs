//! Detached signature verification over arbitrary bytes

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use jsonwebtoken::Algorithm;
use std::str::FromStr;

use crate::errors::SignatureError;

use super::keys::VerificationKey;

const SUPPORTED_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Verifies standard Base64 RSA signatures
///
/// Defaults to RS256 (RSASSA-PKCS1-v1_5 with SHA-256). Stateless and cheap
/// to copy; safe to share between tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureVerifier {
    algorithm: Algorithm,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RS256,
        }
    }
}

impl SignatureVerifier {
    /// Create a verifier for an RSA signature algorithm
    pub fn new(algorithm: Algorithm) -> Result<Self, SignatureError> {
        if !SUPPORTED_ALGORITHMS.contains(&algorithm) {
            return Err(SignatureError::UnsupportedAlgorithm {
                algorithm: format!("{:?}", algorithm),
            });
        }
        Ok(Self { algorithm })
    }

    /// Create a verifier from a JWS algorithm name such as `RS256`
    pub fn from_name(name: &str) -> Result<Self, SignatureError> {
        let algorithm =
            Algorithm::from_str(name).map_err(|_| SignatureError::UnsupportedAlgorithm {
                algorithm: name.to_string(),
            })?;
        Self::new(algorithm)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether `name` is an RSA signature algorithm this verifier accepts
    pub fn is_supported_algorithm(name: &str) -> bool {
        Self::from_name(name).is_ok()
    }

    /// Whether `value` is non-empty, strictly padded standard Base64
    pub fn is_valid_base64(value: &str) -> bool {
        !value.is_empty() && STANDARD.decode(value).is_ok()
    }

    /// Verify a signature, collapsing every failure to `false`
    pub fn verify_signature(&self, data: &[u8], signature_b64: &str, key: &VerificationKey) -> bool {
        self.check_signature(data, signature_b64, key).is_ok()
    }

    /// Verify a signature and report why it was rejected
    ///
    /// Malformed Base64 is rejected before any cryptographic work happens.
    pub fn check_signature(
        &self,
        data: &[u8],
        signature_b64: &str,
        key: &VerificationKey,
    ) -> Result<(), SignatureError> {
        if signature_b64.is_empty() {
            tracing::warn!(event = "signature_malformed", "Empty signature rejected");
            return Err(SignatureError::MalformedSignature);
        }

        let raw = STANDARD.decode(signature_b64).map_err(|e| {
            tracing::warn!(
                event = "signature_malformed",
                error = %e,
                "Signature is not valid Base64"
            );
            SignatureError::MalformedSignature
        })?;

        let encoded = URL_SAFE_NO_PAD.encode(raw);
        let matches = jsonwebtoken::crypto::verify(&encoded, data, key.decoding_key(), self.algorithm)
            .map_err(|e| {
                tracing::error!(
                    event = "signature_crypto_error",
                    algorithm = ?self.algorithm,
                    error = %e,
                    "Signature verification failed inside the crypto provider"
                );
                SignatureError::Crypto {
                    message: e.to_string(),
                }
            })?;

        if !matches {
            tracing::warn!(
                event = "signature_mismatch",
                algorithm = ?self.algorithm,
                "Signature does not match data and key"
            );
            return Err(SignatureError::Mismatch);
        }

        tracing::debug!(event = "signature_verified", algorithm = ?self.algorithm);
        Ok(())
    }
}
