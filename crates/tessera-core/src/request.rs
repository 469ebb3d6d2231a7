//! Request types for Tessera

use crate::cookies::Cookies;
use crate::view::SharedView;
use bytes::Bytes;
use cookie::Cookie;
use http::{header, request::Parts, Extensions, HeaderMap, Method, Uri};

/// HTTP Request wrapper
///
/// Provides access to all parts of an incoming HTTP request, plus the
/// request-scoped state the security layers read and write: the cookie jar,
/// the shared view context and anything stored in extensions.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Bytes,
    pub(crate) cookies: Cookies,
}

impl Request {
    /// Create a request from `http` parts and a buffered body
    pub fn new(parts: Parts, body: Bytes) -> Self {
        let cookies = Cookies::from_headers(&parts.headers);
        Self {
            parts,
            body,
            cookies,
        }
    }

    /// Create a request from an `http::Request` and a buffered body
    pub fn from_http_request<B>(req: http::Request<B>, body: Bytes) -> Self {
        let (parts, _) = req.into_parts();
        Self::new(parts, body)
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Whether the method may change server state (anything but GET, HEAD, OPTIONS, TRACE)
    pub fn is_state_changing(&self) -> bool {
        !self.parts.method.is_safe()
    }

    /// Get the URI
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the query string
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get request extensions
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Get mutable extensions
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Borrow the buffered body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Read a submitted input value by name
    ///
    /// Looks in a JSON body when the content type says so, otherwise in a
    /// urlencoded form body, then falls back to the query string.
    pub fn input(&self, name: &str) -> Option<String> {
        self.body_input(name)
            .or_else(|| self.query_string().and_then(|q| form_value(q.as_bytes(), name)))
    }

    fn body_input(&self, name: &str) -> Option<String> {
        if self.body.is_empty() {
            return None;
        }
        let body = &self.body;

        let is_json = self
            .header(header::CONTENT_TYPE.as_str())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let json: serde_json::Value = serde_json::from_slice(body).ok()?;
            return json.get(name)?.as_str().map(str::to_owned);
        }

        form_value(body, name)
    }

    /// The request-scoped cookie jar
    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    /// Value of a cookie, reflecting changes made earlier in this request
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name)
    }

    /// Queue a cookie to be set on the response
    pub fn set_cookie(&self, cookie: Cookie<'static>) {
        self.cookies.add(cookie);
    }

    /// Queue removal of a cookie
    ///
    /// The path must match the one the cookie was set with.
    pub fn remove_cookie(&self, cookie: Cookie<'static>) {
        self.cookies.remove(cookie);
    }

    /// Values shared with templates for this request
    pub fn view(&self) -> Option<&SharedView> {
        self.parts.extensions.get::<SharedView>()
    }

    /// Mutable shared view, created on first use
    pub fn view_mut(&mut self) -> &mut SharedView {
        self.parts.extensions.get_or_insert_default::<SharedView>()
    }
}

fn form_value(bytes: &[u8], name: &str) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("version", &self.parts.version)
            .finish()
    }
}
