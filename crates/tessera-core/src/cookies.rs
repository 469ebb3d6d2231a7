//! Request-scoped cookie jar
//!
//! A [`Cookies`] handle is created from the incoming `Cookie` header and
//! shared between the request and [`CookieLayer`]. Handlers and layers add or
//! remove cookies through the request; once the inner chain returns,
//! `CookieLayer` writes the accumulated changes as `Set-Cookie` headers.

use crate::middleware::{BoxedNext, MiddlewareLayer};
use crate::request::Request;
use crate::response::Response;
use cookie::{Cookie, CookieJar};
use http::{header, HeaderMap, HeaderValue};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to the cookie jar of one request
#[derive(Clone, Default)]
pub struct Cookies {
    jar: Arc<Mutex<CookieJar>>,
}

impl Cookies {
    /// Build a jar whose original cookies come from the `Cookie` headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = CookieJar::new();

        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            for cookie in Cookie::split_parse(raw).filter_map(|c| c.ok()) {
                jar.add_original(cookie.into_owned());
            }
        }

        Self {
            jar: Arc::new(Mutex::new(jar)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CookieJar> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current value of a cookie
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).map(|c| c.value().to_owned())
    }

    /// Add or replace a cookie
    pub fn add(&self, cookie: Cookie<'static>) {
        self.lock().add(cookie);
    }

    /// Remove a cookie
    ///
    /// A cookie the client sent produces a removal `Set-Cookie`; one that was
    /// only added during this request is simply dropped from the delta.
    pub fn remove(&self, cookie: Cookie<'static>) {
        self.lock().remove(cookie);
    }

    /// `Set-Cookie` values for every change made during the request
    pub fn set_cookie_headers(&self) -> Vec<HeaderValue> {
        self.lock()
            .delta()
            .filter_map(|c| HeaderValue::from_str(&c.to_string()).ok())
            .collect()
    }
}

impl std::fmt::Debug for Cookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.lock().iter().map(|c| c.name().to_owned()).collect();
        f.debug_struct("Cookies").field("names", &names).finish()
    }
}

/// Middleware that flushes the request's cookie changes onto the response
///
/// Register it outermost so every inner layer's changes are captured.
#[derive(Clone, Debug, Default)]
pub struct CookieLayer;

impl CookieLayer {
    /// Create a new cookie layer
    pub fn new() -> Self {
        Self
    }
}

impl MiddlewareLayer for CookieLayer {
    fn call(
        &self,
        req: Request,
        next: BoxedNext,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'static>> {
        let cookies = req.cookies().clone();

        Box::pin(async move {
            let mut response = next(req).await;

            for value in cookies.set_cookie_headers() {
                response.headers_mut().append(header::SET_COOKIE, value);
            }

            response
        })
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
