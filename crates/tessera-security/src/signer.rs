//! Tamper-evident token signing
//!
//! A [`Signer`] turns opaque bytes into a URL-safe token and back. The token
//! carries a version byte, the issue time, a random nonce, the payload and
//! an HMAC-SHA256 tag over all of it:
//!
//! ```text
//! base64url( 0x01 | issued_at: u64 BE | nonce: 16 | payload | tag: 32 )
//! ```
//!
//! Verification needs nothing but the secret, so neither the CSRF guard nor
//! the session store keeps server-side state.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

const VERSION: u8 = 0x01;
const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 32;
const HEADER_LEN: usize = 1 + 8 + NONCE_LEN;
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Signer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The secret is too short to key the MAC safely
    #[error("secret key must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    WeakSecret(usize),

    /// Malformed, forged, altered or stale token
    #[error("invalid token")]
    InvalidToken,
}

/// A signed, URL-safe token string
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignedToken(String);

impl SignedToken {
    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignedToken").field(&"***").finish()
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SignedToken> for String {
    fn from(token: SignedToken) -> Self {
        token.0
    }
}

/// Symmetric signer for opaque payloads
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
    context: Arc<str>,
    max_age: Option<Duration>,
}

impl Signer {
    /// Create a signer keyed with `secret`
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SignerError> {
        let secret = secret.as_ref();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SignerError::WeakSecret(secret.len()));
        }

        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| SignerError::WeakSecret(secret.len()))?;

        Ok(Self {
            mac,
            context: Arc::from(""),
            max_age: None,
        })
    }

    /// Generate a random secret suitable for [`Signer::new`]
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; MIN_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Reject tokens issued longer than `max_age` ago
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Remove any staleness window
    pub fn without_max_age(mut self) -> Self {
        self.max_age = None;
        self
    }

    /// A signer with the same key bound to a different context
    ///
    /// Tokens signed under one context never verify under another.
    pub fn derive(&self, context: &str) -> Self {
        Self {
            mac: self.mac.clone(),
            context: Arc::from(context),
            max_age: self.max_age,
        }
    }

    /// The context this signer is bound to
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The staleness window, if any
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Sign a payload
    pub fn sign(&self, payload: &[u8]) -> SignedToken {
        self.sign_at(payload, now_secs())
    }

    /// Verify a token and recover its payload
    pub fn unsign(&self, token: &str) -> Result<Vec<u8>, SignerError> {
        self.unsign_at(token, now_secs())
    }

    pub(crate) fn sign_at(&self, payload: &[u8], issued_at: u64) -> SignedToken {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut raw = Vec::with_capacity(HEADER_LEN + payload.len() + TAG_LEN);
        raw.push(VERSION);
        raw.extend_from_slice(&issued_at.to_be_bytes());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(payload);

        let tag = self.keyed(&raw).finalize().into_bytes();
        raw.extend_from_slice(&tag);

        SignedToken(URL_SAFE_NO_PAD.encode(raw))
    }

    pub(crate) fn unsign_at(&self, token: &str, now: u64) -> Result<Vec<u8>, SignerError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| SignerError::InvalidToken)?;

        if raw.len() < HEADER_LEN + TAG_LEN || raw[0] != VERSION {
            return Err(SignerError::InvalidToken);
        }

        let (signed, tag) = raw.split_at(raw.len() - TAG_LEN);
        self.keyed(signed)
            .verify_slice(tag)
            .map_err(|_| SignerError::InvalidToken)?;

        let mut ts = [0u8; 8];
        ts.copy_from_slice(&signed[1..9]);
        let issued_at = u64::from_be_bytes(ts);

        if issued_at > now.saturating_add(MAX_CLOCK_SKEW_SECS) {
            return Err(SignerError::InvalidToken);
        }
        if let Some(max_age) = self.max_age {
            if now.saturating_sub(issued_at) > max_age.as_secs() {
                return Err(SignerError::InvalidToken);
            }
        }

        Ok(signed[HEADER_LEN..].to_vec())
    }

    fn keyed(&self, data: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(&(self.context.len() as u32).to_be_bytes());
        mac.update(self.context.as_bytes());
        mac.update(data);
        mac
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("context", &self.context)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"test_secret_key_32_bytes_long!!!";

    fn signer() -> Signer {
        Signer::new(SECRET).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let signer = signer();
        let token = signer.sign(b"hello");
        assert_eq!(signer.unsign(token.as_str()).unwrap(), b"hello");
    }

    #[test]
    fn test_empty_payload() {
        let signer = signer();
        let token = signer.sign(b"");
        assert_eq!(signer.unsign(token.as_str()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_output_is_not_deterministic() {
        let signer = signer();
        assert_ne!(signer.sign(b"same"), signer.sign(b"same"));
    }

    #[test]
    fn test_weak_secret_rejected() {
        assert_eq!(
            Signer::new(b"short").unwrap_err(),
            SignerError::WeakSecret(5)
        );
    }

    #[test]
    fn test_generated_secret_is_usable() {
        let secret = Signer::generate_secret();
        assert!(secret.len() >= MIN_SECRET_LEN);
        assert_ne!(secret, Signer::generate_secret());
        assert!(Signer::new(&secret).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().sign(b"payload");
        let other = Signer::new(b"wrong_secret_key_32_bytes_long!!").unwrap();
        assert_eq!(other.unsign(token.as_str()), Err(SignerError::InvalidToken));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let signer = signer();
        let long = "A".repeat(200);
        for bad in ["", "not base64 !!", "AAAA", long.as_str()] {
            assert_eq!(signer.unsign(bad), Err(SignerError::InvalidToken));
        }

        let token = signer.sign(b"payload");
        let truncated = &token.as_str()[..token.as_str().len() - 4];
        assert_eq!(signer.unsign(truncated), Err(SignerError::InvalidToken));
    }

    #[test]
    fn test_contexts_are_not_interchangeable() {
        let root = signer();
        let csrf = root.derive("csrf");
        let session = root.derive("session");

        let token = csrf.sign(b"payload");
        assert!(csrf.unsign(token.as_str()).is_ok());
        assert!(session.unsign(token.as_str()).is_err());
        assert!(root.unsign(token.as_str()).is_err());
        assert_eq!(session.context(), "session");
    }

    #[test]
    fn test_max_age_window() {
        let signer = signer().with_max_age(Duration::from_secs(60));
        let token = signer.sign_at(b"payload", 1_000);

        assert!(signer.unsign_at(token.as_str(), 1_060).is_ok());
        assert_eq!(
            signer.unsign_at(token.as_str(), 1_061),
            Err(SignerError::InvalidToken)
        );

        // Without a window, age alone never invalidates
        let unlimited = signer.without_max_age();
        assert!(unlimited.unsign_at(token.as_str(), 1_000_000).is_ok());
    }

    #[test]
    fn test_future_tokens_rejected() {
        let signer = signer();
        let token = signer.sign_at(b"payload", 10_000);

        assert!(signer.unsign_at(token.as_str(), 10_000 - MAX_CLOCK_SKEW_SECS).is_ok());
        assert_eq!(
            signer.unsign_at(token.as_str(), 10_000 - MAX_CLOCK_SKEW_SECS - 1),
            Err(SignerError::InvalidToken)
        );
    }

    #[test]
    fn test_debug_hides_key_and_token() {
        let signer = signer();
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("test_secret"));

        let token = signer.sign(b"payload");
        assert_eq!(format!("{:?}", token), "SignedToken(\"***\")");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let signer = signer();
            let token = signer.sign(&payload);
            prop_assert_eq!(signer.unsign(token.as_str()).unwrap(), payload);
        }

        #[test]
        fn prop_any_single_byte_flip_is_rejected(
            payload in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let signer = signer();
            let token = signer.sign(&payload).into_string();

            for i in 0..token.len() {
                let mut bytes = token.clone().into_bytes();
                bytes[i] ^= 0x01;
                let tampered = String::from_utf8(bytes).unwrap();
                prop_assert_eq!(signer.unsign(&tampered), Err(SignerError::InvalidToken));
            }
        }
    }
}
