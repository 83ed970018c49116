//! Request sending with status checks and retries.

use crate::time::{Sleeper, TokioSleeper};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy, RetryableError, SendError};

/// Sends requests through an [`HttpClient`], retrying transient failures.
///
/// A response only counts as success when its status is 2xx. Network
/// errors, 5xx, 408 and 429 are retried according to the configured
/// [`RetryPolicy`]; anything else fails on the spot.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use ipfilter::transport::{ReqwestClient, RequestSender, RetryPolicy};
///
/// let sender = RequestSender::new(ReqwestClient::new())
///     .with_retry_policy(RetryPolicy::no_retry());
/// assert_eq!(sender.retry_policy().max_attempts, 1);
/// ```
#[derive(Debug, Clone)]
pub struct RequestSender<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    retry_policy: RetryPolicy,
}

impl<H> RequestSender<H, TokioSleeper> {
    /// Creates a sender with the default retry policy and [`TokioSleeper`].
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<H, S> RequestSender<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestSender<H, S2> {
        RequestSender {
            client: self.client,
            sleeper,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }
}

impl<H: HttpClient, S: Sleeper> RequestSender<H, S> {
    /// Sends `request`, retrying until it succeeds or the policy gives up.
    ///
    /// # Errors
    ///
    /// - [`SendError::Failed`] for a non-retryable failure (bad URL, 4xx)
    /// - [`SendError::MaxRetriesExceeded`] when every attempt failed transiently
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SendError> {
        let mut attempt = 1;

        loop {
            let error = match self.execute(request).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if !error.is_retryable() {
                return Err(SendError::Failed(error));
            }

            if !self.retry_policy.should_retry(attempt) {
                return Err(SendError::MaxRetriesExceeded {
                    attempts: attempt,
                    last_error: error,
                });
            }

            let delay = self.retry_policy.delay_for_retry(attempt - 1);
            tracing::debug!(
                "{} {} failed (attempt {attempt}): {error}, retrying in {delay:?}",
                request.method,
                request.url
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }

    /// Executes a single attempt.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RetryableError> {
        let response = self.client.request(request.clone()).await?;

        if response.is_success() {
            return Ok(response);
        }

        Err(RetryableError::NonSuccessStatus {
            status: response.status,
            body: response.text().map(ToString::to_string),
        })
    }
}

/// Extension trait for checking if an error is retryable.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidUrl(_) | Self::BodyTooLarge { .. } => false,
        }
    }
}

impl IsRetryable for RetryableError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            Self::NonSuccessStatus { status, .. } => {
                status.is_server_error()
                    || *status == http::StatusCode::TOO_MANY_REQUESTS
                    || *status == http::StatusCode::REQUEST_TIMEOUT
            }
        }
    }
}
