//! # tessera-security
//!
//! Stateless request security built on one primitive, the [`Signer`]:
//!
//! - [`csrf`] - a CSRF guard that issues signed tokens on safe requests and
//!   verifies the submitted `__token` on state-changing ones
//! - [`session`] - a cookie credential store that signs the principal's
//!   public attributes with an expiry and resolves them back on later
//!   requests
//! - [`settings`] - environment-driven configuration for both
//!
//! ## Example
//!
//! ```ignore
//! use tessera_core::{CookieLayer, LayerStack};
//! use tessera_security::{AuthLayer, CsrfLayer, SecuritySettings};
//!
//! let settings = SecuritySettings::from_env()?;
//! let signer = settings.signer()?;
//!
//! let stack = LayerStack::new()
//!     .layer(CookieLayer::new())
//!     .layer(CsrfLayer::new(&signer, settings.csrf_config()))
//!     .layer(AuthLayer::new(&signer, settings.session_config(), users));
//! ```

#![warn(missing_docs)]

pub mod csrf;
pub mod session;
pub mod settings;
pub mod signer;

pub use csrf::{CsrfConfig, CsrfError, CsrfLayer, CsrfToken, CsrfTokens};
pub use session::{
    AuthLayer, CurrentUser, IdentityProvider, Principal, SessionConfig, SessionError,
    SessionPayload, SessionStore,
};
pub use settings::SecuritySettings;
pub use signer::{SignedToken, Signer, SignerError};
