// Backdesk API HTTP client
//
// Wraps `reqwest::Client` with URL construction, bearer-token auth, and
// error-body decoding. Endpoint groups (compliance, customers, rewards,
// reference data) are implemented as inherent methods via separate files
// to keep this module focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape the backend uses for non-2xx responses:
/// `{"message": "..."}`, sometimes `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Backdesk CRM REST API.
///
/// All endpoints live under `{base}/api/v1/`. The bearer token is injected
/// as a default header so every request carries it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client authenticating with the given bearer token.
    pub fn new(base_url: Url, token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Authentication {
                message: "token contains characters invalid in an HTTP header".into(),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests that point at a mock server and don't need auth.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a POST request where only the HTTP status matters.
    ///
    /// Bulk mutation endpoints return no payload the client relies on.
    pub(crate) async fn post_no_content(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::status_error(status, resp.text().await.unwrap_or_default()))
    }

    /// Decode a response, mapping non-2xx statuses into typed errors.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::status_error(status, body));
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Map an error status plus raw body into the typed error taxonomy.
    fn status_error(status: reqwest::StatusCode, body: String) -> Error {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| body[..body.len().min(200)].to_owned());

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication {
                message: if message.is_empty() {
                    "token rejected or session revoked".into()
                } else {
                    message
                },
            },
            reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
            reqwest::StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
                retry_after_secs: 60,
            },
            _ => Error::Api {
                message,
                status: status.as_u16(),
            },
        }
    }
}
