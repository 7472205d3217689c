//! HTTP client for probing upstream endpoints.

use reqwest::{Client, Method, header};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;

use super::endpoints::EndpointDefinition;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Outcome of one endpoint probe that reached the upstream service.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body for 2xx responses; `Err` carries the parse failure text.
    /// `None` for non-2xx responses, whose bodies are not inspected.
    pub body: Option<std::result::Result<Value, String>>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin authenticated wrapper around outbound upstream requests.
pub struct ApiClient {
    client: Client,
    api_url: String,
    game_server_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(upstream: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(upstream.request_timeout_secs))
            .user_agent(&upstream.user_agent)
            .build()
            .map_err(|e| FetchError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            api_url: upstream.api_url.trim_end_matches('/').to_string(),
            game_server_url: upstream.game_server_url.trim_end_matches('/').to_string(),
            session_cookie: upstream.session_cookie.clone(),
        })
    }

    pub fn has_auth(&self) -> bool {
        self.session_cookie.is_some()
    }

    /// URL an endpoint definition resolves to.
    pub fn url_for(&self, def: &EndpointDefinition) -> String {
        let base = if def.use_game_server {
            &self.game_server_url
        } else {
            &self.api_url
        };
        format!("{base}{}", def.path)
    }

    /// Probe one endpoint. Transport-level failures (timeout, connection
    /// refused) surface as [`FetchError`]; anything that produced an HTTP
    /// status comes back as an [`ApiResponse`].
    pub async fn fetch(&self, def: &EndpointDefinition) -> Result<ApiResponse> {
        let url = self.url_for(def);
        debug!(url, "checking endpoint");

        let method = Method::from_bytes(def.method.as_bytes())
            .map_err(|_| FetchError::InvalidConfig(format!("invalid method: {}", def.method)))?;

        let mut request = self.client.request(method, &url);
        if !def.params.is_empty() {
            request = request.query(def.params);
        }
        if def.requires_auth {
            if let Some(cookie) = &self.session_cookie {
                request = request.header(header::COOKIE, format!("_ncfa={cookie}"));
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = if response.status().is_success() {
            Some(response.json::<Value>().await.map_err(|e| e.to_string()))
        } else {
            None
        };

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::endpoints::MONITORED_ENDPOINTS;

    fn test_client() -> ApiClient {
        ApiClient::new(&UpstreamConfig {
            api_url: "https://stats.example.com/api/".to_string(),
            game_server_url: "https://game.example.com/api".to_string(),
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_resolution_trims_trailing_slash() {
        let client = test_client();
        let profiles = MONITORED_ENDPOINTS
            .iter()
            .find(|e| e.path == "/v3/profiles")
            .unwrap();
        assert_eq!(
            client.url_for(profiles),
            "https://stats.example.com/api/v3/profiles"
        );
    }

    #[test]
    fn test_game_server_endpoints_use_other_base() {
        let client = test_client();
        let tournaments = MONITORED_ENDPOINTS
            .iter()
            .find(|e| e.use_game_server)
            .unwrap();
        assert_eq!(
            client.url_for(tournaments),
            "https://game.example.com/api/tournaments"
        );
    }

    #[test]
    fn test_has_auth_reflects_cookie() {
        assert!(!test_client().has_auth());

        let with_cookie = ApiClient::new(&UpstreamConfig {
            session_cookie: Some("secret".to_string()),
            ..UpstreamConfig::default()
        })
        .unwrap();
        assert!(with_cookie.has_auth());
    }
}
