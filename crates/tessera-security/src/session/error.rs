use tessera_core::ApiError;
use thiserror::Error;

/// Session store errors
///
/// None of these are caused by what a client sends; they mean tokens are
/// being issued from bad data.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A verified, unexpired token carried no identity
    #[error("session payload is missing identity key `{0}`")]
    MissingIdentity(String),

    /// Issue time plus lifetime is not a representable timestamp
    #[error("session lifetime overflows the expiry timestamp")]
    LifetimeOverflow,

    /// The principal did not serialize to a JSON object
    #[error("principal must serialize to a JSON object")]
    NotAnObject,

    /// The payload could not be serialized
    #[error("failed to serialize session payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::internal("Authentication failed").with_internal(err.to_string())
    }
}
