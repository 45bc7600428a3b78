// src/types/domain_types.rs
//! Validated newtypes for the API token and page size.

use super::ValidationError;
use crate::constants::MAX_PAGE_SIZE;
use std::fmt;

/// API token with validation.
///
/// The token travels verbatim in the `Authorization` header, so anything
/// that cannot be a header value is rejected up front instead of failing
/// on the first request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Create a new API token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into().trim().to_string();

        if token.is_empty() {
            return Err(ValidationError::InvalidApiToken {
                reason: "API token cannot be empty".to_string(),
            });
        }

        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidApiToken {
                reason: "API token must not contain whitespace or control characters".to_string(),
            });
        }

        if !token.is_ascii() {
            return Err(ValidationError::InvalidApiToken {
                reason: "API token must be ASCII".to_string(),
            });
        }

        Ok(Self(token))
    }

    /// Get the API token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the secret, even in debug output.
impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken(***)")
    }
}

/// Number of records requested per cursor page, bounded by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    pub fn new(size: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ValidationError::OutOfBounds {
                name: "page size",
                value: size,
                min: 1,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self(size))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_validation() {
        assert!(ApiToken::new("eyJhbGciOiJIUzI1NiJ9.abc").is_ok());
        assert!(ApiToken::new("   ").is_err());
        assert!(ApiToken::new("two words").is_err());
        assert!(ApiToken::new("line\nbreak").is_err());
    }

    #[test]
    fn test_api_token_is_trimmed_and_redacted() {
        let token = ApiToken::new("  secret-token\n").unwrap();
        assert_eq!(token.as_str(), "secret-token");
        assert_eq!(format!("{:?}", token), "ApiToken(***)");
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(PageSize::new(1).unwrap().get(), 1);
        assert_eq!(PageSize::new(500).unwrap().get(), 500);
        assert!(PageSize::new(0).is_err());
        assert_eq!(
            PageSize::new(501).unwrap_err(),
            ValidationError::OutOfBounds {
                name: "page size",
                value: 501,
                min: 1,
                max: 500
            }
        );
    }
}
