use super::config::SessionConfig;
use super::error::SessionError;
use super::identity::{CurrentUser, IdentityProvider, Principal};
use super::payload::SessionPayload;
use crate::signer::{SignedToken, Signer};
use chrono::{DateTime, Utc};
use cookie::Cookie;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tessera_core::Request;
use tracing::{debug, error};

/// Signs principals into the session cookie and resolves them back.
pub struct SessionStore<P> {
    signer: Signer,
    config: Arc<SessionConfig>,
    _principal: PhantomData<fn() -> P>,
}

impl<P> Clone for SessionStore<P> {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            config: self.config.clone(),
            _principal: PhantomData,
        }
    }
}

impl<P> fmt::Debug for SessionStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("signer", &self.signer)
            .field("config", &self.config)
            .finish()
    }
}

impl<P: Principal> SessionStore<P> {
    /// Create a store whose tokens are bound to the "session" context of `signer`.
    pub fn new(signer: &Signer, config: SessionConfig) -> Self {
        let signer = match config.token_max_age {
            Some(max_age) => signer.derive("session").with_max_age(max_age),
            None => signer.derive("session").without_max_age(),
        };

        Self {
            signer,
            config: Arc::new(config),
            _principal: PhantomData,
        }
    }

    /// The store configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolve the principal named by the session cookie.
    ///
    /// Returns `Ok(None)` when there is no lookup, no cookie, or the cookie
    /// does not hold a verified, unexpired payload. A payload lacking the
    /// identity key is an error: such a token could only have been issued
    /// from bad data.
    pub async fn resolve<I>(
        &self,
        req: &Request,
        lookup: Option<&I>,
    ) -> Result<Option<P>, SessionError>
    where
        I: IdentityProvider<Principal = P> + ?Sized,
    {
        let Some(lookup) = lookup else {
            return Ok(None);
        };
        let Some(token) = req.cookie(&self.config.cookie_name) else {
            return Ok(None);
        };
        let Some(payload) = self.decode(&token) else {
            debug!("ignoring session cookie that failed verification");
            return Ok(None);
        };
        if !payload.is_valid_at(Utc::now()) {
            debug!("session expired");
            return Ok(None);
        }

        let identity = payload.identity(&self.config.identity_key).ok_or_else(|| {
            error!(
                key = %self.config.identity_key,
                "verified session token has no identity"
            );
            SessionError::MissingIdentity(self.config.identity_key.clone())
        })?;

        Ok(lookup.find_by_identity(identity).await)
    }

    /// Sign `principal` into the session cookie.
    pub fn persist(&self, req: &Request, principal: &P) -> Result<(), SessionError> {
        let token = self.encode(principal, Utc::now())?;
        req.set_cookie(self.session_cookie(token.into_string()));
        Ok(())
    }

    /// Persist `principal` and make it the current user of this request.
    pub fn login(&self, req: &mut Request, principal: P) -> Result<(), SessionError> {
        self.persist(req, &principal)?;
        req.extensions_mut().insert(CurrentUser(principal));
        Ok(())
    }

    /// Queue removal of the session cookie.
    pub fn clear(&self, req: &Request) {
        let mut cookie = Cookie::build((self.config.cookie_name.clone(), ""))
            .path(self.config.cookie_path.clone())
            .build();
        if let Some(domain) = &self.config.cookie_domain {
            cookie.set_domain(domain.clone());
        }
        req.remove_cookie(cookie);
    }

    /// Clear the session and forget the current user. Safe to call twice.
    pub fn logout(&self, req: &mut Request) {
        self.clear(req);
        req.extensions_mut().remove::<CurrentUser<P>>();
    }

    /// Serialize and sign a principal as of `now`.
    pub fn encode(&self, principal: &P, now: DateTime<Utc>) -> Result<SignedToken, SessionError> {
        let attributes = match serde_json::to_value(principal)? {
            Value::Object(map) => map,
            _ => return Err(SessionError::NotAnObject),
        };

        let payload = SessionPayload::issue(
            attributes,
            &self.config.hidden_fields,
            now,
            self.config.lifetime,
        )?;
        if payload.identity(&self.config.identity_key).is_none() {
            return Err(SessionError::MissingIdentity(
                self.config.identity_key.clone(),
            ));
        }

        let bytes = serde_json::to_vec(&payload)?;
        Ok(self.signer.sign(&bytes))
    }

    /// Verify and parse a token. Expiry is not checked here.
    pub fn decode(&self, token: &str) -> Option<SessionPayload> {
        let bytes = self.signer.unsign(token).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        let max_age = cookie::time::Duration::seconds(self.config.lifetime.num_seconds());
        let mut cookie = Cookie::build((self.config.cookie_name.clone(), value))
            .path(self.config.cookie_path.clone())
            .http_only(self.config.cookie_http_only)
            .secure(self.config.cookie_secure)
            .same_site(self.config.same_site)
            .max_age(max_age)
            .build();
        if let Some(domain) = &self.config.cookie_domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    #[cfg(test)]
    pub(crate) fn signer(&self) -> &Signer {
        &self.signer
    }
}
