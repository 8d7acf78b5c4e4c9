/*
[INPUT]:  HTTP configuration (base URL, anon key, timeouts) and the shared session
[OUTPUT]: Configured reqwest client ready for REST and auth calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::auth::SessionManager;
use crate::http::{DevflowError, Result};
use crate::types::ApiErrorBody;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the hosted task store
///
/// Cheap to clone; clones share the connection pool and the session slot.
#[derive(Debug, Clone)]
pub struct DevflowClient {
    http_client: Client,
    base_url: Url,
    anon_key: String,
    session: SessionManager,
    timeout: Duration,
}

impl DevflowClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, anon_key, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(
        base_url: &str,
        anon_key: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(DevflowError::Config("anon key must not be empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            anon_key,
            session: SessionManager::new(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Shared session slot used for the bearer token and task ownership
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Build a request with the `apikey` and bearer headers attached.
    ///
    /// The bearer is the live session token, falling back to the anon key.
    pub(crate) fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let mut url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }

        let bearer = self
            .session
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());

        tracing::debug!(%method, %url, "Sending request");
        Ok(self
            .http_client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer))
    }

    /// Send and decode a JSON body, mapping non-2xx statuses to errors.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request whose response body is irrelevant.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                DevflowError::Timeout {
                    duration: self.timeout.as_secs(),
                }
            } else {
                DevflowError::Http(err)
            }
        })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Received response");
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body.trim().to_string()
                }
            });

        tracing::warn!(status = status.as_u16(), %message, "Request rejected");
        Err(DevflowError::from_status(status, message, retry_after))
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(DevflowError::Config("backend url must not be empty".to_string()));
    }

    let mut url = Url::parse(trimmed)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let url = normalize_base_url("https://example.test/proxy").unwrap();
        assert_eq!(url.as_str(), "https://example.test/proxy/");
        assert_eq!(
            url.join("rest/v1/tasks").unwrap().as_str(),
            "https://example.test/proxy/rest/v1/tasks"
        );
    }

    #[test]
    fn empty_settings_are_config_errors() {
        assert!(matches!(
            DevflowClient::new("", "key"),
            Err(DevflowError::Config(_))
        ));
        assert!(matches!(
            DevflowClient::new("https://example.test", " "),
            Err(DevflowError::Config(_))
        ));
    }
}
