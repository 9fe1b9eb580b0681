//! Random token generation
//!
//! Tokens are the plaintext half of a token slot: handed to the user once
//! (in a link or a client credential) while only their digest is stored.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Bytes of entropy per token. 24 bytes comfortably clears the 16-byte
/// floor and encodes to 32 URL-safe characters.
const TOKEN_BYTES: usize = 24;

/// Generate a URL-safe random token from the OS RNG.
///
/// No collision check is performed anywhere; the entropy makes one
/// pointless.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
