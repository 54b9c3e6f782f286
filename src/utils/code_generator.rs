//! Short id generation.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

/// Generates a cryptographically secure random short id.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character id.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 12);
/// ```
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_length_and_alphabet() {
        let code = generate_code();

        assert_eq!(code.len(), 12);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_code_uniqueness() {
        let codes: HashSet<_> = (0..1000).map(|_| generate_code()).collect();

        assert_eq!(codes.len(), 1000);
    }
}
