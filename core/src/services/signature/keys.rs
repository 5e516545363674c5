//! RSA key material for signing and verifying detached signatures

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use sv_shared::config::KeyConfig;

use crate::errors::{DomainError, KeyError, SignatureError};

use super::verifier::SignatureVerifier;

/// Where a key was loaded from, for diagnostics only
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySource {
    File(PathBuf),
    Memory,
}

/// Public half of an RSA key pair
#[derive(Clone)]
pub struct VerificationKey {
    key: DecodingKey,
    source: KeySource,
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("source", &self.source)
            .finish()
    }
}

impl VerificationKey {
    /// Parse a PEM encoded RSA public key (SPKI `PUBLIC KEY` or PKCS#1 `RSA PUBLIC KEY`)
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| KeyError::Format {
            message: format!("Invalid public key format: {}", e),
        })?;

        Ok(Self {
            key,
            source: KeySource::Memory,
        })
    }

    /// Load a PEM encoded RSA public key from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem = read_pem(path)?;
        let mut key = Self::from_pem(&pem)?;
        key.source = KeySource::File(path.to_path_buf());
        Ok(key)
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

/// Private half of an RSA key pair
///
/// Produces standard Base64 signatures accepted by
/// [`SignatureVerifier::check_signature`].
#[derive(Clone)]
pub struct SigningKey {
    key: EncodingKey,
    algorithm: Algorithm,
    source: KeySource,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("source", &self.source)
            .finish()
    }
}

impl SigningKey {
    /// Parse a PEM encoded RSA private key (PKCS#1 or PKCS#8), signing with RS256
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| KeyError::Format {
            message: format!("Invalid private key format: {}", e),
        })?;

        Ok(Self {
            key,
            algorithm: Algorithm::RS256,
            source: KeySource::Memory,
        })
    }

    /// Load a PEM encoded RSA private key from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem = read_pem(path)?;
        let mut key = Self::from_pem(&pem)?;
        key.source = KeySource::File(path.to_path_buf());
        Ok(key)
    }

    /// Switch to another RSA signature algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self, SignatureError> {
        SignatureVerifier::new(algorithm)?;
        self.algorithm = algorithm;
        Ok(self)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign `data`, returning the signature as standard Base64
    pub fn sign(&self, data: &[u8]) -> Result<String, SignatureError> {
        let url_safe = jsonwebtoken::crypto::sign(data, &self.key, self.algorithm).map_err(|e| {
            SignatureError::Crypto {
                message: e.to_string(),
            }
        })?;

        let raw = URL_SAFE_NO_PAD
            .decode(url_safe)
            .map_err(|e| SignatureError::Crypto {
                message: e.to_string(),
            })?;

        Ok(STANDARD.encode(raw))
    }
}

/// Signing and verification keys of one issuer
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub signing: SigningKey,
    pub verification: VerificationKey,
}

impl KeyPair {
    /// Build a key pair from PEM strings (embedded keys, tests)
    pub fn from_pem_strings(signing_pem: &str, verification_pem: &str) -> Result<Self, KeyError> {
        Ok(Self {
            signing: SigningKey::from_pem(signing_pem)?,
            verification: VerificationKey::from_pem(verification_pem)?,
        })
    }

    /// Load both keys from disk
    pub fn from_files<P: AsRef<Path>>(signing_path: P, verification_path: P) -> Result<Self, KeyError> {
        Ok(Self {
            signing: SigningKey::from_file(signing_path)?,
            verification: VerificationKey::from_file(verification_path)?,
        })
    }

    /// Load the key files and algorithm named in the configuration
    pub fn from_config(config: &KeyConfig) -> Result<Self, DomainError> {
        let verifier = SignatureVerifier::from_name(&config.algorithm)?;
        let pair = Self::from_files(&config.signing_key_path, &config.verification_key_path)?;

        Ok(Self {
            signing: pair.signing.with_algorithm(verifier.algorithm())?,
            verification: pair.verification,
        })
    }
}

fn read_pem(path: &Path) -> Result<String, KeyError> {
    fs::read_to_string(path).map_err(|e| KeyError::Load {
        message: format!("{}: {}", path.display(), e),
    })
}
