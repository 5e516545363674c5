mod verifier_tests;

use crate::services::signature::KeyPair;

const SIGNING_KEY_PEM: &str = include_str!("../../../../tests/fixtures/signing_key.pem");
const VERIFICATION_KEY_PEM: &str = include_str!("../../../../tests/fixtures/verification_key.pem");
const FOREIGN_VERIFICATION_KEY_PEM: &str =
    include_str!("../../../../tests/fixtures/foreign_verification_key.pem");

fn key_pair() -> KeyPair {
    KeyPair::from_pem_strings(SIGNING_KEY_PEM, VERIFICATION_KEY_PEM).unwrap()
}
