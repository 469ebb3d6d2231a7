use chrono::Duration;
use cookie::SameSite;

/// Cookie holding the signed session
pub const DEFAULT_COOKIE_NAME: &str = "token";

/// Attribute that identifies the principal
pub const DEFAULT_IDENTITY_KEY: &str = "id";

/// Configuration for the session credential store.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Name of the session cookie.
    /// Default: "token"
    pub cookie_name: String,

    /// How long a session lasts after login. Also used as the cookie's Max-Age.
    /// Default: 60 minutes
    pub lifetime: Duration,

    /// Attribute used to look the principal up again.
    /// Default: "id"
    pub identity_key: String,

    /// Attributes never written into the token.
    /// Default: ["password"]
    pub hidden_fields: Vec<String>,

    /// Staleness window enforced by the signer, independent of `lifetime`.
    /// Default: None
    pub token_max_age: Option<std::time::Duration>,

    /// The path for the session cookie.
    /// Default: "/"
    pub cookie_path: String,

    /// The domain for the session cookie.
    /// Default: None
    pub cookie_domain: Option<String>,

    /// Whether the cookie is sent over HTTPS only.
    /// Default: true
    pub cookie_secure: bool,

    /// Whether scripts are denied access to the cookie.
    /// Default: true
    pub cookie_http_only: bool,

    /// The SameSite attribute for the cookie.
    /// Default: Lax
    pub same_site: SameSite,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            lifetime: Duration::minutes(60),
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
            hidden_fields: vec!["password".to_string()],
            token_max_age: None,
            cookie_path: "/".to_string(),
            cookie_domain: None,
            cookie_secure: true,
            cookie_http_only: true,
            same_site: SameSite::Lax,
        }
    }
}

impl SessionConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie name.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the session lifetime.
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set the identity attribute.
    pub fn identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    /// Add an attribute to strip before signing.
    pub fn hide_field(mut self, field: impl Into<String>) -> Self {
        self.hidden_fields.push(field.into());
        self
    }

    /// Set the signer's staleness window.
    pub fn token_max_age(mut self, max_age: Option<std::time::Duration>) -> Self {
        self.token_max_age = max_age;
        self
    }

    /// Set the cookie domain.
    pub fn cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    /// Set the secure flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Set the SameSite attribute.
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }
}
