//! Short code generation and shape checks.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

/// Longest string accepted as a short code.
pub const MAX_CODE_LEN: usize = 32;

/// Generates a random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character code.
///
/// # Errors
///
/// Fails only if the operating system entropy source is unavailable.
pub fn generate_code() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer)?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Whether `code` could have been issued by [`generate_code`].
///
/// Used to reject obviously malformed codes before touching storage.
pub fn is_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
