use std::time::Duration;

/// Form field the token is submitted in
pub const DEFAULT_FIELD_NAME: &str = "__token";

/// Header checked when the form field is absent
pub const DEFAULT_HEADER_NAME: &str = "X-CSRF-TOKEN";

/// Configuration for CSRF protection.
#[derive(Clone, Debug)]
pub struct CsrfConfig {
    /// Form field carrying the token.
    /// Default: "__token"
    pub field_name: String,

    /// Header consulted when the form field is missing; `None` disables it.
    /// Default: "X-CSRF-TOKEN"
    pub header_name: Option<String>,

    /// Paths that skip verification. Matched exactly, no prefixes or patterns.
    /// Default: empty
    pub exempt: Vec<String>,

    /// How long an issued token stays valid; `None` means forever.
    /// Default: 1 hour
    pub token_ttl: Option<Duration>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            header_name: Some(DEFAULT_HEADER_NAME.to_string()),
            exempt: Vec::new(),
            token_ttl: Some(Duration::from_secs(60 * 60)),
        }
    }
}

impl CsrfConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the form field name.
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Set the fallback header name.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = Some(name.into());
        self
    }

    /// Only accept the token from the form field.
    pub fn without_header(mut self) -> Self {
        self.header_name = None;
        self
    }

    /// Add paths that bypass verification.
    pub fn exempt<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Set the token lifetime.
    pub fn token_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Whether `path` is exempt from verification.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.iter().any(|p| p == path)
    }
}
