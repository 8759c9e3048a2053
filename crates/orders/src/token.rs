//! Confirmation token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// How many token characters the human-typed confirmation code carries.
const CODE_CHARS: usize = 6;

/// Mint a fresh single-use confirmation token: 16 random bytes,
/// URL-safe base64 without padding.
pub fn mint_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// The code a human must type back to confirm an order.
///
/// A legibility device, not a secret: the token itself is the credential.
pub fn confirmation_code(token: &str) -> String {
    let prefix: String = token.chars().take(CODE_CHARS).collect();
    format!("CONFIRM-{prefix}")
}
