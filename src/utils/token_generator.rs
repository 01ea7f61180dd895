//! Short link token generation.
//!
//! Tokens are 128-bit values drawn from the operating system's CSPRNG and
//! rendered as version-4 UUIDs in their 32-character lowercase hex form.
//! Uniqueness is not checked here; the repository's `create` rejects a
//! duplicate token with [`crate::error::RepositoryError::DuplicateToken`].

use crate::error::GenerationError;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 16;

/// Length of a rendered token.
pub const TOKEN_LENGTH: usize = 32;

/// Source of new short link tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenGenerator: Send + Sync {
    /// Produces a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EntropyUnavailable`] if the entropy source fails.
    fn new_token(&self) -> Result<String, GenerationError>;
}

/// Default generator backed by the system random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn new_token(&self) -> Result<String, GenerationError> {
        generate_token()
    }
}

/// Generates a random token.
///
/// # Errors
///
/// Returns [`GenerationError::EntropyUnavailable`] if `getrandom` cannot
/// fill the buffer.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token()?;
/// assert_eq!(token.len(), 32);
/// ```
pub fn generate_token() -> Result<String, GenerationError> {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer)
        .map_err(|e| GenerationError::EntropyUnavailable(e.to_string()))?;

    Ok(uuid::Builder::from_random_bytes(buffer)
        .into_uuid()
        .simple()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_has_correct_length() {
        let token = generate_token().unwrap();
        assert_eq!(token.len(), TOKEN_LENGTH);
    }

    #[test]
    fn test_generate_token_is_lowercase_hex() {
        let token = generate_token().unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_generate_token_is_uuid_v4() {
        let token = generate_token().unwrap();
        let parsed = uuid::Uuid::parse_str(&token).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_generate_token_produces_unique_tokens() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token().unwrap()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_random_generator_uses_system_source() {
        let generator = RandomTokenGenerator;
        let first = generator.new_token().unwrap();
        let second = generator.new_token().unwrap();
        assert_ne!(first, second);
    }
}
