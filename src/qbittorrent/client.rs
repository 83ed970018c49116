//! WebUI API calls.

use std::path::Path;

use serde::Deserialize;

use super::QbError;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, RequestSender, SendError};

const LOGIN: &str = "/api/v2/auth/login";
const PREFERENCES: &str = "/api/v2/app/preferences";
const SET_PREFERENCES: &str = "/api/v2/app/setPreferences";

/// Body qBittorrent answers a rejected login with.
const LOGIN_FAILED: &str = "Fails.";

/// Session cookie set by a successful login.
const SESSION_COOKIE: &str = "SID";

/// WebUI username and password.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Login is only attempted when both fields are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The subset of WebUI preferences this tool cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Preferences {
    /// Whether IP filtering is on
    #[serde(default)]
    pub ip_filter_enabled: bool,
    /// Path of the filter file qBittorrent reads
    #[serde(default)]
    pub ip_filter_path: String,
}

/// Parses a WebUI address into an API base URL.
///
/// `http://` is assumed when no scheme is given. Path, query and fragment
/// are dropped. Credentials embedded as `user:pass@host` are split off and
/// returned separately.
///
/// # Errors
///
/// Returns the parse error for malformed addresses.
///
/// # Example
///
/// ```
/// use ipfilter::qbittorrent::parse_webui_url;
///
/// let (url, creds) = parse_webui_url("admin:secret@localhost:8080/ui").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8080/");
/// assert_eq!(creds.unwrap().username, "admin");
/// ```
pub fn parse_webui_url(raw: &str) -> Result<(url::Url, Option<Credentials>), url::ParseError> {
    let raw = raw.trim();
    let mut url = if raw.contains("://") {
        url::Url::parse(raw)?
    } else {
        url::Url::parse(&format!("http://{raw}"))?
    };

    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(url::ParseError::EmptyHost);
    }

    let credentials = (!url.username().is_empty()).then(|| {
        let decode = |s: &str| {
            // Percent-decode through the form decoder; a literal '+' must survive
            let escaped = format!("x={}", s.replace('+', "%2B"));
            url::form_urlencoded::parse(escaped.as_bytes())
                .next()
                .map_or_else(|| s.to_string(), |(_, v)| v.into_owned())
        };
        Credentials::new(decode(url.username()), decode(url.password().unwrap_or_default()))
    });

    // Only fails for cannot-be-a-base URLs, ruled out above
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);

    Ok((url, credentials))
}

/// Client for one qBittorrent instance.
///
/// # Example
///
/// ```no_run
/// use ipfilter::qbittorrent::{Credentials, QbClient, parse_webui_url};
/// use ipfilter::transport::{ReqwestClient, RequestSender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (base, _) = parse_webui_url("localhost:8080")?;
/// let creds = Credentials::new("admin", "adminadmin");
/// let mut client = QbClient::connect(RequestSender::new(ReqwestClient::new()), base, &creds).await?;
/// client.set_ip_filter(std::path::Path::new("/data/ipfilter-a.dat")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QbClient<H, S = TokioSleeper> {
    sender: RequestSender<H, S>,
    base: url::Url,
    session: Option<http::HeaderValue>,
    credentials: Option<Credentials>,
}

impl<H, S> QbClient<H, S> {
    /// Creates an unauthenticated client for the WebUI at `base`.
    #[must_use]
    pub const fn new(sender: RequestSender<H, S>, base: url::Url) -> Self {
        Self {
            sender,
            base,
            session: None,
            credentials: None,
        }
    }

    /// Returns the WebUI base URL.
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.base
    }

    /// Returns `true` once a session cookie was obtained.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn endpoint(&self, path: &str) -> url::Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    fn with_session(&self, request: HttpRequest) -> HttpRequest {
        match &self.session {
            Some(cookie) => request.with_cookie(cookie.clone()),
            None => request,
        }
    }
}

impl<H: HttpClient, S: Sleeper> QbClient<H, S> {
    /// Creates a client, logging in when `credentials` are complete.
    ///
    /// # Errors
    ///
    /// Returns [`QbError`] if the login fails.
    pub async fn connect(
        sender: RequestSender<H, S>,
        base: url::Url,
        credentials: &Credentials,
    ) -> Result<Self, QbError> {
        let mut client = Self::new(sender, base);
        if credentials.is_complete() {
            tracing::info!("Logging in to {} as {}", client.base, credentials.username);
            client.login(credentials).await?;
        } else {
            tracing::info!("No WebUI credentials, skipping login");
        }
        Ok(client)
    }

    /// Logs in and keeps the session cookie for later calls.
    ///
    /// # Errors
    ///
    /// - [`QbError::LoginRejected`] if qBittorrent answers `Fails.`
    /// - [`QbError::Request`] on transport failure or non-2xx status
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), QbError> {
        let request = HttpRequest::post(self.endpoint(LOGIN)).with_form([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);

        let response = self
            .sender
            .send(&request)
            .await
            .map_err(|source| QbError::Request {
                action: "login",
                source,
            })?;

        if response.text().is_some_and(|b| b.trim() == LOGIN_FAILED) {
            return Err(QbError::LoginRejected {
                username: credentials.username.clone(),
            });
        }

        self.session = response.cookie(SESSION_COOKIE);
        if self.session.is_none() {
            tracing::debug!("Login response carried no SID cookie");
        }
        self.credentials = Some(credentials.clone());
        Ok(())
    }

    /// Sends `request` with the session cookie.
    ///
    /// A 401 or 403 after a login means the session expired; the client
    /// logs in once more with the stored credentials and repeats the call.
    async fn call(
        &mut self,
        action: &'static str,
        request: HttpRequest,
    ) -> Result<HttpResponse, QbError> {
        let first = self.sender.send(&self.with_session(request.clone())).await;

        let result = match (first, self.credentials.clone()) {
            (Err(e), Some(credentials)) if is_unauthorized(&e) => {
                tracing::info!("WebUI session expired, logging in again as {}", credentials.username);
                self.login(&credentials).await?;
                self.sender.send(&self.with_session(request)).await
            }
            (first, _) => first,
        };

        result.map_err(|source| QbError::Request { action, source })
    }

    /// Reads the current preferences.
    ///
    /// # Errors
    ///
    /// Returns [`QbError`] on transport failure or malformed JSON.
    pub async fn preferences(&mut self) -> Result<Preferences, QbError> {
        let request = HttpRequest::get(self.endpoint(PREFERENCES));
        let response = self.call("preferences", request).await?;

        serde_json::from_slice(&response.body).map_err(QbError::InvalidPreferences)
    }

    /// Enables IP filtering and points it at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`QbError::Request`] on transport failure or non-2xx status.
    pub async fn set_ip_filter(&mut self, path: &Path) -> Result<(), QbError> {
        let json = serde_json::json!({
            "ip_filter_enabled": true,
            "ip_filter_path": path.to_string_lossy(),
        })
        .to_string();

        let request =
            HttpRequest::post(self.endpoint(SET_PREFERENCES)).with_form([("json", json.as_str())]);
        self.call("setPreferences", request).await?;

        tracing::debug!("qBittorrent now reads {}", path.display());
        Ok(())
    }
}

fn is_unauthorized(error: &SendError) -> bool {
    matches!(
        error.status(),
        Some(http::StatusCode::UNAUTHORIZED | http::StatusCode::FORBIDDEN)
    )
}
