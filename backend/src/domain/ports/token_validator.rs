//! Port resolving access tokens into authenticated callers.
//!
//! Token issuance and cryptography live behind this port. The course
//! service only needs the caller's role and email.

use async_trait::async_trait;

use crate::domain::{AccessToken, Caller, Error};

/// Resolve opaque access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Resolve `token` into the caller it was issued to.
    ///
    /// Unknown tokens and tokens carrying an unrecognised role fail with
    /// [`crate::domain::ErrorCode::InvalidCredentials`].
    async fn resolve(&self, token: &AccessToken) -> Result<Caller, Error>;
}

/// Validator rejecting every token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenValidator;

#[async_trait]
impl TokenValidator for FixtureTokenValidator {
    async fn resolve(&self, _token: &AccessToken) -> Result<Caller, Error> {
        Err(Error::invalid_credentials())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_rejects_tokens() {
        let token = AccessToken::new("anything").expect("non-empty token");
        let err = FixtureTokenValidator
            .resolve(&token)
            .await
            .expect_err("fixture rejects");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }
}
