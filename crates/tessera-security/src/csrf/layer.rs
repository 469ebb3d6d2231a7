use super::config::CsrfConfig;
use super::token::{CsrfToken, CsrfTokens};
use crate::signer::Signer;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tessera_core::{ApiError, BoxedNext, IntoResponse, MiddlewareLayer, Request, Response};

/// What the guard does with a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrfAction {
    /// Mint a fresh token
    Issue,
    /// Require a valid submitted token
    Verify,
}

/// Middleware enforcing CSRF tokens on state-changing requests.
#[derive(Clone, Debug)]
pub struct CsrfLayer {
    config: Arc<CsrfConfig>,
    tokens: Arc<CsrfTokens>,
}

impl CsrfLayer {
    /// Create a new CSRF middleware layer.
    pub fn new(signer: &Signer, config: CsrfConfig) -> Self {
        let tokens = CsrfTokens::new(signer, config.token_ttl);
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }

    /// The token service backing this layer.
    pub fn tokens(&self) -> &CsrfTokens {
        &self.tokens
    }

    /// Decide between issuing and verifying for `req`.
    pub fn action_for(&self, req: &Request) -> CsrfAction {
        if req.is_state_changing() && !self.config.is_exempt(req.path()) {
            CsrfAction::Verify
        } else {
            CsrfAction::Issue
        }
    }

    fn candidate(&self, req: &Request) -> Option<String> {
        req.input(&self.config.field_name).or_else(|| {
            self.config
                .header_name
                .as_deref()
                .and_then(|name| req.header(name))
                .map(str::to_owned)
        })
    }
}

impl MiddlewareLayer for CsrfLayer {
    fn call(
        &self,
        mut req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let action = self.action_for(&req);

        let token = match action {
            CsrfAction::Issue => {
                tracing::debug!(path = %req.path(), "issuing csrf token");
                Ok(self.tokens.generate())
            }
            CsrfAction::Verify => {
                let candidate = self.candidate(&req);
                let verified = self.tokens.verify(candidate.as_deref());
                if verified.is_ok() {
                    tracing::debug!(path = %req.path(), "csrf token verified");
                }
                verified
            }
        };

        let token: CsrfToken = match token {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.path(),
                    "rejected request with invalid csrf token"
                );
                let response = ApiError::from(err).into_response();
                return Box::pin(async move { response });
            }
        };

        let field = token.field_html(&self.config.field_name);
        let view = req.view_mut();
        view.share("csrf_field", &field);
        view.share("csrf_token", token.as_str());
        req.extensions_mut().insert(token);

        Box::pin(async move { next(req).await })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
