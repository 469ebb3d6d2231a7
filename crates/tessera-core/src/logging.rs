//! Tracing subscriber setup

use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global `fmt` subscriber
///
/// `RUST_LOG` wins when set; otherwise the environment's default level
/// (debug in development, info elsewhere) applies to every target.
/// Calling this more than once is harmless.
pub fn init_tracing(env: &Environment) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env)))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn default_filter(env: &Environment) -> EnvFilter {
    let level = env.default_log_level();
    EnvFilter::new(format!(
        "{level},tessera={level},tessera_core={level},tessera_security={level}"
    ))
}
