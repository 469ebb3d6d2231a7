//! # Tessera
//!
//! Stateless request security for Rust web services: signed CSRF tokens and
//! signed-cookie authentication, both keyed from one secret.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//!
//! #[derive(Clone, Serialize)]
//! struct User {
//!     id: u64,
//!     email: String,
//!     password: String, // never written into the cookie
//! }
//!
//! struct Users(Db);
//!
//! #[async_trait]
//! impl IdentityProvider for Users {
//!     type Principal = User;
//!
//!     async fn find_by_identity(&self, id: &serde_json::Value) -> Option<User> {
//!         self.0.find_user(id.as_u64()?).await
//!     }
//! }
//!
//! let settings = SecuritySettings::from_env()?;
//! init_tracing(&settings.environment());
//! let signer = settings.signer()?;
//!
//! let stack = LayerStack::new()
//!     .layer(CookieLayer::new())
//!     .layer(CsrfLayer::new(&signer, settings.csrf_config()))
//!     .layer(AuthLayer::new(&signer, settings.session_config(), Users(db)));
//! ```
//!
//! Layers run in the order they are pushed. [`CookieLayer`] must come first
//! so cookies written by the later layers and handlers reach the response.

// Re-export core functionality
pub use tessera_core::*;

// Re-export security
pub use tessera_security::{csrf, session, settings, signer};
pub use tessera_security::{
    AuthLayer, CsrfConfig, CsrfError, CsrfLayer, CsrfToken, CsrfTokens, CurrentUser,
    IdentityProvider, Principal, SecuritySettings, SessionConfig, SessionError, SessionPayload,
    SessionStore, SignedToken, Signer, SignerError,
};

/// Prelude module - import everything you need with `use tessera::prelude::*`
pub mod prelude {
    // Core types
    pub use tessera_core::{
        logging::init_tracing, ApiError, BoxedNext, CookieLayer, Cookies, Environment, Html,
        IntoResponse, LayerStack, MiddlewareLayer, Request, Response, Result, SharedView,
        Templates,
    };

    // Security
    pub use tessera_security::{
        AuthLayer, CsrfConfig, CsrfLayer, CsrfToken, CurrentUser, IdentityProvider,
        SecuritySettings, SessionConfig, SessionStore, Signer,
    };

    // Re-export commonly used external types
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}
