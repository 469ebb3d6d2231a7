//! # Tessera Core
//!
//! Foundational types shared by the Tessera security layers: the request
//! wrapper, the response type and [`ApiError`], the middleware chain, the
//! request-scoped cookie jar and the view context that templates read from.
//!
//! This crate is not meant to be used directly. Use `tessera` instead.

#![warn(missing_docs)]

pub mod config;
pub mod cookies;
mod error;
pub mod logging;
pub mod middleware;
mod request;
mod response;
pub mod view;

// Public API
pub use config::{Config, ConfigError, Environment};
pub use cookies::{CookieLayer, Cookies};
pub use error::{ApiError, Result};
pub use middleware::{BoxedNext, LayerStack, MiddlewareLayer};
pub use request::Request;
pub use response::{Html, IntoResponse, Response};
pub use view::{SharedView, Templates};
