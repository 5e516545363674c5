//! Input shape validation, sanitising and masking
//!
//! These helpers only look at the shape of a value. They never consult a
//! network service or a store.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum number of characters in an acceptable password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of trailing characters left visible by [`mask_identifier`]
pub const VISIBLE_SUFFIX: usize = 4;

// Local part and domain restricted to a conservative character set; no DNS check
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").unwrap()
});

// Optional leading plus, 7 to 15 digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{7,15}$").unwrap()
});

/// Characters stripped by [`sanitize`]
const UNSAFE_CHARS: [char; 5] = ['<', '>', '\\', '"', '\''];

/// Check if an e-mail address has an acceptable shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a password meets the strength policy
///
/// At least [`MIN_PASSWORD_LENGTH`] characters with at least one digit,
/// one lowercase and one uppercase letter.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}

/// Check if a phone number has an acceptable shape
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Trim whitespace and strip characters that are unsafe in logs and messages
pub fn sanitize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !UNSAFE_CHARS.contains(c))
        .collect()
}

/// Check if a string is empty or whitespace only
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Replace every character of a secret with `*`
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// Mask an identifier keeping only the last [`VISIBLE_SUFFIX`] characters
///
/// Identifiers of [`VISIBLE_SUFFIX`] characters or fewer are fully masked.
pub fn mask_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX {
        return mask_secret(identifier);
    }

    let hidden = chars.len() - VISIBLE_SUFFIX;
    let suffix: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), suffix)
}
