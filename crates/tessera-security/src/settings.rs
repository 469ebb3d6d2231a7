//! Environment-driven security settings
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TESSERA_SECRET_KEY` | required, at least 32 bytes |
//! | `TESSERA_ENV` | `development` |
//! | `TESSERA_CSRF_EXEMPT` | none; comma-separated exact paths |
//! | `TESSERA_CSRF_TOKEN_TTL_SECS` | 3600; `0` disables expiry |
//! | `TESSERA_SESSION_LIFETIME_MINUTES` | 60; at most one year |
//! | `TESSERA_COOKIE_SECURE` | true in production, false otherwise |

use crate::csrf::CsrfConfig;
use crate::session::SessionConfig;
use crate::signer::Signer;
use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tessera_core::config::{load_dotenv, Config, ConfigError, Environment};

const PREFIX: &str = "TESSERA";
const DEFAULT_CSRF_TOKEN_TTL_SECS: u64 = 60 * 60;
const DEFAULT_SESSION_LIFETIME_MINUTES: i64 = 60;
const MAX_SESSION_LIFETIME_MINUTES: i64 = 366 * 24 * 60;

/// Security settings read from `TESSERA_*` variables.
#[derive(Clone, Deserialize)]
pub struct SecuritySettings {
    /// Key for every signed token
    pub secret_key: String,

    /// Raw environment name
    #[serde(default)]
    pub env: Option<String>,

    /// Paths that skip CSRF verification
    #[serde(default)]
    pub csrf_exempt: Vec<String>,

    /// CSRF token lifetime in seconds
    #[serde(default)]
    pub csrf_token_ttl_secs: Option<u64>,

    /// Session lifetime in minutes
    #[serde(default = "default_session_lifetime")]
    pub session_lifetime_minutes: i64,

    /// Explicit secure-cookie flag
    #[serde(default)]
    pub cookie_secure: Option<bool>,
}

fn default_session_lifetime() -> i64 {
    DEFAULT_SESSION_LIFETIME_MINUTES
}

impl SecuritySettings {
    /// Load `.env`, then read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Config::<Self>::from_env_prefixed(PREFIX)?.into_inner().validated()
    }

    /// Read settings from explicit variables, e.g. `("TESSERA_SECRET_KEY", ..)`.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Config::<Self>::from_iter_prefixed(PREFIX, vars)?
            .into_inner()
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let invalid_lifetime = |reason: &str| ConfigError::Invalid {
            name: "TESSERA_SESSION_LIFETIME_MINUTES".to_string(),
            reason: reason.to_string(),
        };

        if self.session_lifetime_minutes <= 0 {
            return Err(invalid_lifetime("must be positive"));
        }
        if self.session_lifetime_minutes > MAX_SESSION_LIFETIME_MINUTES {
            return Err(invalid_lifetime("must not exceed one year"));
        }
        chrono::Duration::try_minutes(self.session_lifetime_minutes)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| invalid_lifetime("out of range"))?;

        self.signer()?;
        Ok(self)
    }

    fn session_lifetime(&self) -> chrono::Duration {
        let minutes = self
            .session_lifetime_minutes
            .clamp(1, MAX_SESSION_LIFETIME_MINUTES);
        chrono::Duration::try_minutes(minutes)
            .unwrap_or_else(|| chrono::Duration::minutes(DEFAULT_SESSION_LIFETIME_MINUTES))
    }

    /// The selected environment.
    pub fn environment(&self) -> Environment {
        Environment::parse(self.env.as_deref())
    }

    /// A signer keyed with the secret.
    pub fn signer(&self) -> Result<Signer, ConfigError> {
        Signer::new(self.secret_key.as_bytes()).map_err(|err| ConfigError::Invalid {
            name: "TESSERA_SECRET_KEY".to_string(),
            reason: err.to_string(),
        })
    }

    /// CSRF guard configuration.
    pub fn csrf_config(&self) -> CsrfConfig {
        let ttl = match self.csrf_token_ttl_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_CSRF_TOKEN_TTL_SECS)),
        };

        CsrfConfig::new()
            .exempt(
                self.csrf_exempt
                    .iter()
                    .map(|path| path.trim())
                    .filter(|path| !path.is_empty()),
            )
            .token_ttl(ttl)
    }

    /// Session store configuration.
    pub fn session_config(&self) -> SessionConfig {
        let secure = self
            .cookie_secure
            .unwrap_or_else(|| self.environment().is_production());

        SessionConfig::new()
            .lifetime(self.session_lifetime())
            .secure(secure)
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("secret_key", &"***")
            .field("env", &self.env)
            .field("csrf_exempt", &self.csrf_exempt)
            .field("csrf_token_ttl_secs", &self.csrf_token_ttl_secs)
            .field("session_lifetime_minutes", &self.session_lifetime_minutes)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = SecuritySettings::from_vars(vars(&[("TESSERA_SECRET_KEY", SECRET)])).unwrap();

        assert_eq!(settings.environment(), Environment::Development);
        assert!(settings.csrf_exempt.is_empty());

        let csrf = settings.csrf_config();
        assert_eq!(csrf.token_ttl, Some(Duration::from_secs(3600)));
        assert!(csrf.exempt.is_empty());

        let session = settings.session_config();
        assert_eq!(session.lifetime, chrono::Duration::minutes(60));
        assert!(!session.cookie_secure);
    }

    #[test]
    fn test_overrides() {
        let settings = SecuritySettings::from_vars(vars(&[
            ("TESSERA_SECRET_KEY", SECRET),
            ("TESSERA_ENV", "production"),
            ("TESSERA_CSRF_EXEMPT", "/webhooks/stripe,/api/ping"),
            ("TESSERA_CSRF_TOKEN_TTL_SECS", "0"),
            ("TESSERA_SESSION_LIFETIME_MINUTES", "15"),
        ]))
        .unwrap();

        let csrf = settings.csrf_config();
        assert!(csrf.is_exempt("/webhooks/stripe"));
        assert!(csrf.is_exempt("/api/ping"));
        assert!(!csrf.is_exempt("/webhooks"));
        assert_eq!(csrf.token_ttl, None);

        let session = settings.session_config();
        assert_eq!(session.lifetime, chrono::Duration::minutes(15));
        assert!(session.cookie_secure);
    }

    #[test]
    fn test_explicit_cookie_secure_wins() {
        let settings = SecuritySettings::from_vars(vars(&[
            ("TESSERA_SECRET_KEY", SECRET),
            ("TESSERA_ENV", "production"),
            ("TESSERA_COOKIE_SECURE", "false"),
        ]))
        .unwrap();
        assert!(!settings.session_config().cookie_secure);
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = SecuritySettings::from_vars(vars(&[("TESSERA_ENV", "dev")])).unwrap_err();
        assert!(matches!(err, ConfigError::Envy(_)));
    }

    #[test]
    fn test_short_secret_fails() {
        let err = SecuritySettings::from_vars(vars(&[("TESSERA_SECRET_KEY", "short")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == "TESSERA_SECRET_KEY"));
    }

    #[test]
    fn test_non_positive_lifetime_fails() {
        let err = SecuritySettings::from_vars(vars(&[
            ("TESSERA_SECRET_KEY", SECRET),
            ("TESSERA_SESSION_LIFETIME_MINUTES", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_oversized_lifetime_fails() {
        for minutes in ["9223372036854775807", "200000000000", "527041"] {
            let err = SecuritySettings::from_vars(vars(&[
                ("TESSERA_SECRET_KEY", SECRET),
                ("TESSERA_SESSION_LIFETIME_MINUTES", minutes),
            ]))
            .unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { name, .. } if name == "TESSERA_SESSION_LIFETIME_MINUTES"),
                "{} minutes accepted: {:?}",
                minutes,
                err
            );
        }
    }

    #[test]
    fn test_lifetime_cap_is_usable() {
        let settings = SecuritySettings::from_vars(vars(&[
            ("TESSERA_SECRET_KEY", SECRET),
            ("TESSERA_SESSION_LIFETIME_MINUTES", "527040"),
        ]))
        .unwrap();
        assert_eq!(settings.session_config().lifetime, chrono::Duration::days(366));
    }

    #[test]
    fn test_session_config_never_panics_on_mutated_lifetime() {
        let mut settings =
            SecuritySettings::from_vars(vars(&[("TESSERA_SECRET_KEY", SECRET)])).unwrap();
        settings.session_lifetime_minutes = i64::MAX;
        assert_eq!(settings.session_config().lifetime, chrono::Duration::days(366));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = SecuritySettings::from_vars(vars(&[("TESSERA_SECRET_KEY", SECRET)])).unwrap();
        assert!(!format!("{:?}", settings).contains(SECRET));
    }
}
