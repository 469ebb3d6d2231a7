//! CSRF protection with stateless signed tokens
//!
//! Safe requests (and state-changing requests to exempt paths) are issued a
//! fresh signed token. Any other state-changing request must submit a token
//! previously issued by the same secret in the `__token` form field, or the
//! request is rejected with `403 invalid_csrf_token`.
//!
//! Either way the active token is shared with templates as `csrf_token`, and
//! a ready-made hidden input as `csrf_field`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_core::{CookieLayer, LayerStack};
//! use tessera_security::csrf::{CsrfConfig, CsrfLayer};
//!
//! let config = CsrfConfig::new().exempt(["/webhooks/stripe"]);
//! let stack = LayerStack::new()
//!     .layer(CookieLayer::new())
//!     .layer(CsrfLayer::new(&signer, config));
//! ```

mod config;
mod error;
mod layer;
mod token;

pub use config::{CsrfConfig, DEFAULT_FIELD_NAME, DEFAULT_HEADER_NAME};
pub use error::CsrfError;
pub use layer::{CsrfAction, CsrfLayer};
pub use token::{CsrfToken, CsrfTokens};
