use super::error::CsrfError;
use crate::signer::Signer;
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use std::time::Duration;

const CONTEXT: &str = "csrf";
const TOKEN_BYTES: usize = 32;

/// A CSRF token that was issued or verified for the current request.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hidden input carrying the token in `field_name`.
    pub fn field_html(&self, field_name: &str) -> String {
        format!(
            "<input type='hidden' name='{}' value='{}' />",
            field_name, self.0
        )
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"***").finish()
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and verifies CSRF tokens.
///
/// A token is 32 random bytes signed under the `csrf` context, so validity
/// is proven by the signature alone and nothing is stored server side.
#[derive(Clone, Debug)]
pub struct CsrfTokens {
    signer: Signer,
}

impl CsrfTokens {
    /// Create a token service from the application signer.
    pub fn new(signer: &Signer, ttl: Option<Duration>) -> Self {
        let signer = signer.derive(CONTEXT);
        let signer = match ttl {
            Some(ttl) => signer.with_max_age(ttl),
            None => signer.without_max_age(),
        };
        Self { signer }
    }

    /// Generate a fresh token.
    pub fn generate(&self) -> CsrfToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        CsrfToken(self.signer.sign(&bytes).into_string())
    }

    /// Verify a submitted token. A missing token is invalid.
    pub fn verify(&self, candidate: Option<&str>) -> Result<CsrfToken, CsrfError> {
        let candidate = candidate.ok_or(CsrfError::InvalidToken)?;

        match self.signer.unsign(candidate) {
            Ok(payload) if payload.len() == TOKEN_BYTES => Ok(CsrfToken(candidate.to_owned())),
            _ => Err(CsrfError::InvalidToken),
        }
    }
}
