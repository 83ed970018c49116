//! [`HttpClient`] over reqwest.

use std::time::Duration;

use super::body::LimitedBody;
use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Per-request timeout, covering the body download.
const TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("ipfilter/", env!("CARGO_PKG_VERSION"));

/// Real HTTP client. Clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use ipfilter::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://example.com/ipfilter.dat")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("{} bytes", response.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client with the crate's user agent and timeout.
    ///
    /// Falls back to reqwest's defaults if the builder fails (e.g. no TLS
    /// backend).
    #[must_use]
    pub fn new() -> Self {
        let inner = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { inner }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            max_body,
        } = req;

        let mut builder = self.inner.request(method, url.as_str()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let mut response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();

        let mut body = LimitedBody::start(max_body, response.content_length())?;
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            body.push(&chunk)?;
        }

        Ok(HttpResponse::new(status, headers, body.finish()))
    }
}

fn classify(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_builder() {
        HttpError::InvalidUrl(error.to_string())
    } else {
        HttpError::Connection(Box::new(error))
    }
}
