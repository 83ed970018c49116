//! Request and response values exchanged with an [`HttpClient`].

use std::sync::Arc;

use http::{HeaderMap, HeaderValue, Method, StatusCode, header};

use super::HttpError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request to a list server or the qBittorrent WebUI.
///
/// Only the two shapes the crate needs exist: plain `GET` downloads and
/// form-encoded `POST` calls, optionally carrying a session cookie.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// `GET` or `POST`
    pub method: Method,
    /// Target URL
    pub url: url::Url,
    /// Headers to send
    pub headers: HeaderMap,
    /// Encoded form body, if any
    pub body: Option<Vec<u8>>,
    /// Largest response body the caller accepts
    pub max_body: Option<usize>,
}

impl HttpRequest {
    fn with_method(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            max_body: None,
        }
    }

    /// A `GET` request with no headers.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::with_method(Method::GET, url)
    }

    /// A `POST` request with no body yet.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::with_method(Method::POST, url)
    }

    /// Encodes `fields` as the form body and sets the content type.
    #[must_use]
    pub fn with_form<'a>(mut self, fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        self.body = Some(encoded.into_bytes());
        self
    }

    /// Caps the response body at `limit` bytes.
    ///
    /// Clients reject a larger `Content-Length` before reading and stop
    /// reading once the limit is crossed.
    #[must_use]
    pub const fn with_max_body(mut self, limit: usize) -> Self {
        self.max_body = Some(limit);
        self
    }

    /// Sends `cookie` (e.g. `SID=...`) with the request.
    #[must_use]
    pub fn with_cookie(mut self, cookie: HeaderValue) -> Self {
        self.headers.insert(header::COOKIE, cookie);
        self
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body as UTF-8, or `None` for binary content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Finds cookie `name` among the `Set-Cookie` headers.
    ///
    /// Returns `name=value` ready to be sent back, without attributes.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<HeaderValue> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .find(|pair| {
                pair.split_once('=')
                    .is_some_and(|(key, _)| key.trim() == name)
            })
            .and_then(|pair| HeaderValue::from_str(pair).ok())
    }
}

/// Sends requests over some HTTP implementation.
///
/// [`ReqwestClient`](super::ReqwestClient) is the real one; tests script
/// their own to stand in for list servers and the WebUI.
pub trait HttpClient: Send + Sync {
    /// Performs one exchange.
    ///
    /// Any status code counts as a completed exchange here;
    /// [`RequestSender`](super::RequestSender) decides what is a failure.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response was received.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}
