
pub(crate) const SIGNING_KEY_PEM: &str = include_str!("../../../../tests/fixtures/signing_key.pem");
pub(crate) const VERIFICATION_KEY_PEM: &str =
    include_str!("../../../../tests/fixtures/verification_key.pem");
pub(crate) const FOREIGN_VERIFICATION_KEY_PEM: &str =
    include_str!("../../../../tests/fixtures/foreign_verification_key.pem");
pub(crate) const SUBSCRIPTION_CHANGE_SIGNATURE: &str =
    include_str!("../../../../tests/fixtures/subscription_change.sig");
pub(crate) const SUBSCRIPTION_CHANGE_DATA: &[u8] = b"subscription-change:plan=premium;user=u1";
