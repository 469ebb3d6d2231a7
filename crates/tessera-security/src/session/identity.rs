use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tessera_core::Request;

/// An authenticatable identity.
///
/// Its serde representation must be a JSON object; that object (minus
/// hidden fields) is what ends up in the session token.
pub trait Principal: Serialize + Clone + Send + Sync + 'static {}

impl<T> Principal for T where T: Serialize + Clone + Send + Sync + 'static {}

/// Looks principals up by identity, usually against a database.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The principal type this provider returns
    type Principal: Principal;

    /// Find the principal whose identity attribute equals `identity`.
    async fn find_by_identity(&self, identity: &Value) -> Option<Self::Principal>;
}

/// The principal authenticated for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser<P>(pub P);

impl<P: Principal> CurrentUser<P> {
    /// The principal cached on `req`, if any.
    pub fn get(req: &Request) -> Option<&P> {
        req.extensions().get::<CurrentUser<P>>().map(|user| &user.0)
    }
}
