//! Middleware chain
//!
//! Layers wrap each other in registration order; the first layer pushed is
//! the outermost one.

mod layer;

pub use layer::{BoxedNext, LayerStack, MiddlewareLayer};
