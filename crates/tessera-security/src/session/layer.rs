use super::config::SessionConfig;
use super::identity::{CurrentUser, IdentityProvider};
use super::store::SessionStore;
use crate::signer::Signer;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tessera_core::{ApiError, BoxedNext, IntoResponse, MiddlewareLayer, Request, Response};

/// Middleware that resolves the session cookie into a [`CurrentUser`].
///
/// The [`SessionStore`] is also placed in the request extensions so handlers
/// can log principals in and out.
pub struct AuthLayer<I: IdentityProvider> {
    store: SessionStore<I::Principal>,
    identities: Arc<I>,
}

impl<I: IdentityProvider> Clone for AuthLayer<I> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            identities: self.identities.clone(),
        }
    }
}

impl<I: IdentityProvider> AuthLayer<I> {
    /// Create a new authentication layer.
    pub fn new(signer: &Signer, config: SessionConfig, identities: I) -> Self {
        Self {
            store: SessionStore::new(signer, config),
            identities: Arc::new(identities),
        }
    }

    /// The store used by this layer.
    pub fn store(&self) -> &SessionStore<I::Principal> {
        &self.store
    }
}

impl<I: IdentityProvider> MiddlewareLayer for AuthLayer<I> {
    fn call(
        &self,
        mut req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let store = self.store.clone();
        let identities = self.identities.clone();

        Box::pin(async move {
            match store.resolve(&req, Some(identities.as_ref())).await {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(CurrentUser(user));
                }
                Ok(None) => {}
                Err(err) => return ApiError::from(err).into_response(),
            }

            req.extensions_mut().insert(store);
            next(req).await
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
