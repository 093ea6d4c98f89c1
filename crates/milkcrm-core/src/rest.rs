//! REST client for the CRM backend.
//!
//! Implements every remote-source contract over HTTP+JSON. The session is
//! handed in explicitly; the client never looks credentials up on its own.

use crate::dashboard::{DashboardData, DashboardQuery};
use crate::entity::EntityKind;
use crate::error::RemoteError;
use crate::models::EntityId;
use crate::source::{AccountSource, DashboardSource, RemoteSource};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials attached to every request.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bearer-token session. A blank token is treated as no token.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Canonical form of a backend URL, without a trailing slash or `/api`.
///
/// A bare host gets `https://`, or `http://` when it is a loopback host.
/// Input that still does not parse is returned as typed so the caller can
/// report it.
pub fn normalize_base_url(raw: &str) -> String {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else if raw.starts_with("localhost") || raw.starts_with("127.0.0.1") {
        format!("http://{raw}")
    } else {
        format!("https://{raw}")
    };

    let Ok(mut url) = Url::parse(&with_scheme) else {
        return with_scheme;
    };
    let mut segments: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if segments.last().is_some_and(|last| last == "api") {
        segments.pop();
    }
    url.set_path(&segments.join("/"));
    url.set_query(None);
    url.set_fragment(None);

    url.as_str().trim_end_matches('/').to_string()
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Convert a transport failure into a user-readable error.
fn transport_error(url: &str, err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout { url: url.to_string() }
    } else if err.is_connect() {
        RemoteError::Unreachable { url: url.to_string() }
    } else if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Other(format!("Network error communicating with {url}: {err}"))
    }
}

/// Fallback text for a status without a server message.
fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Session is invalid or expired".to_string(),
        403 => "Not authorized".to_string(),
        404 => "Not found".to_string(),
        s if s >= 500 => format!("Server error (HTTP {s})"),
        s => format!("Unexpected response from server (HTTP {s})"),
    }
}

pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl RestClient {
    /// `timeout` of `None` leaves requests without a deadline.
    pub fn new(base_url: &str, session: Session, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let normalized = normalize_base_url(base_url);
        let base = Url::parse(&format!("{normalized}/"))
            .map_err(|e| RemoteError::Other(format!("Invalid server URL {normalized}: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RemoteError::Other(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!(
            "REST client for {} (authenticated: {})",
            base,
            session.is_authenticated()
        );
        Ok(Self { http, base, session })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of `api/<segments...>`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Other(format!("Invalid server URL {}", self.base)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.session.authorize(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<reqwest::Response, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(url.as_str(), &e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_message(status));
        tracing::warn!("{} returned {}: {}", url, status, message);

        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T, RemoteError> {
        let response = self.send(request, url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url.as_str(), &e))?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

impl<K: EntityKind> RemoteSource<K> for RestClient {
    async fn list(&self) -> Result<Vec<K::Record>, RemoteError> {
        let url = self.endpoint(&[K::RESOURCE])?;
        tracing::debug!("GET {}", url);
        self.send_json(self.request(Method::GET, url.clone()), &url).await
    }

    async fn create(&self, payload: &K::Payload) -> Result<K::Record, RemoteError> {
        let url = self.endpoint(&[K::RESOURCE])?;
        tracing::debug!("POST {}", url);
        let request = self.request(Method::POST, url.clone()).json(payload);
        self.send_json(request, &url).await
    }

    async fn update(&self, id: &EntityId, payload: &K::Payload) -> Result<K::Record, RemoteError> {
        let url = self.endpoint(&[K::RESOURCE, id.as_str()])?;
        tracing::debug!("PUT {}", url);
        let request = self.request(Method::PUT, url.clone()).json(payload);
        self.send_json(request, &url).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RemoteError> {
        let url = self.endpoint(&[K::RESOURCE, id.as_str()])?;
        tracing::debug!("DELETE {}", url);
        self.send(self.request(Method::DELETE, url.clone()), &url)
            .await
            .map(|_| ())
    }
}

impl DashboardSource for RestClient {
    async fn dashboard(&self, query: &DashboardQuery) -> Result<DashboardData, RemoteError> {
        let mut url = self.endpoint(&["admin", "dashboard"])?;
        url.query_pairs_mut().extend_pairs(query.params());
        tracing::debug!("GET {}", url);
        self.send_json(self.request(Method::GET, url.clone()), &url).await
    }
}

impl AccountSource for RestClient {
    async fn change_password(&self, current: &str, new: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&["admin", "change-password"])?;
        tracing::debug!("POST {}", url);
        let body = serde_json::json!({
            "currentPassword": current,
            "newPassword": new,
        });
        let request = self.request(Method::POST, url.clone()).json(&body);
        self.send(request, &url).await.map(|_| ())
    }
}
