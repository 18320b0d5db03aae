//! Session store that talks to the session server over HTTP.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::{
    DimensionsResponse, SessionError, SessionErrorKind, SessionPatch, SessionRecord, SessionStore,
    TallyKey, WinnerRequest,
};

/// HTTP client for the session server's routes.
#[derive(Debug, Clone)]
pub struct HttpSessionStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSessionStore {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads only the board dimension (`GET /dimensions`).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on transport failure or a non-success status.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn read_dimensions(&self) -> Result<u32, SessionError> {
        let response = self.client.get(self.url("/dimensions")).send().await?;
        let body: DimensionsResponse = check_status(response).await?.json().await?;
        debug!(dimensions = body.dimensions, "Dimensions received");
        Ok(body.dimensions)
    }
}

/// Turns a non-success response into a transport error carrying its body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(%status, body = %body, "Session server returned an error");
    Err(SessionError::new(SessionErrorKind::Transport(format!(
        "{}: {}",
        status, body
    ))))
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn read_session(&self) -> Result<SessionRecord, SessionError> {
        let response = self.client.get(self.url("/session")).send().await?;
        let record = check_status(response).await?.json().await?;
        debug!(?record, "Session received");
        Ok(record)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn write_session(&self, patch: SessionPatch) -> Result<(), SessionError> {
        let response = self
            .client
            .post(self.url("/state"))
            .json(&patch)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn record_winner(&self, key: TallyKey) -> Result<(), SessionError> {
        let response = self
            .client
            .post(self.url("/winner"))
            .json(&WinnerRequest { winner: key })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn reset(&self) -> Result<SessionRecord, SessionError> {
        let response = self.client.get(self.url("/")).send().await?;
        let record = check_status(response).await?.json().await?;
        Ok(record)
    }
}
