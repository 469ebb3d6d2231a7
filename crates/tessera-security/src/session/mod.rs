//! Cookie-based authentication
//!
//! [`SessionStore`] signs a principal's public attributes together with an
//! issue time and an expiry into the `token` cookie, and reverses the process
//! on later requests. Anything wrong with the cookie (missing, forged,
//! unparseable, expired) simply means "nobody is logged in"; only a token
//! that verifies but carries no identity is treated as an error.
//!
//! [`AuthLayer`] runs the lookup once per request and leaves the result in
//! the request as [`CurrentUser`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_security::session::{AuthLayer, CurrentUser, SessionConfig, SessionStore};
//!
//! let stack = LayerStack::new()
//!     .layer(CookieLayer::new())
//!     .layer(AuthLayer::new(&signer, SessionConfig::default(), users));
//!
//! // In a login handler
//! let store = req.extensions().get::<SessionStore<User>>().cloned().unwrap();
//! store.login(&mut req, user)?;
//!
//! // In a logout handler
//! store.logout(&mut req);
//! ```

mod config;
mod error;
mod identity;
mod layer;
mod payload;
mod store;

pub use config::{SessionConfig, DEFAULT_COOKIE_NAME, DEFAULT_IDENTITY_KEY};
pub use error::SessionError;
pub use identity::{CurrentUser, IdentityProvider, Principal};
pub use layer::AuthLayer;
pub use payload::SessionPayload;
pub use store::SessionStore;
