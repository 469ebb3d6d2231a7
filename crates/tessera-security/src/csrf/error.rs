use http::StatusCode;
use tessera_core::ApiError;
use thiserror::Error;

/// CSRF verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfError {
    /// Missing, forged, altered or expired token
    #[error("Invalid CSRF token.")]
    InvalidToken,
}

impl From<CsrfError> for ApiError {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::InvalidToken => {
                ApiError::new(StatusCode::FORBIDDEN, "invalid_csrf_token", err.to_string())
            }
        }
    }
}
