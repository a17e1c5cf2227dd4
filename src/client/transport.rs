//! Shared HTTP transport for every resource client

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::rate_limit::RateLimiterSet;
use super::resource::Resource;
use crate::config::{Config, DEFAULT_API_HOST};
use crate::error::{ApiError, Result};

/// Fallback when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Transport settings shared by all resource clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme + host, without the `/api/v1` suffix
    pub api_host: String,
    /// Bearer token; anonymous requests when unset
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            ..Default::default()
        }
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        ClientConfig::new(config.api_host()).token(config.token.clone())
    }
}

/// HTTP transport: connection pool, auth header, throttling and status mapping.
pub struct Transport {
    http: HttpClient,
    api_root: String,
    token: Option<String>,
    rate_limiters: RateLimiterSet,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(concat!("polarop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_root: format!("{}/api/v1", config.api_host.trim_end_matches('/')),
            token: config.token.clone(),
            rate_limiters: RateLimiterSet::new(),
        })
    }

    /// Root URL every resource path is appended to
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Send a request and decode the JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        resource: Resource,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.send(resource, method, path, query, body).await?;
        let data = response.json::<T>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    /// Send a request whose response body is irrelevant.
    pub async fn request_empty(
        &self,
        resource: Resource,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<()> {
        self.send(resource, method, path, query, body).await?;
        Ok(())
    }

    async fn send(
        &self,
        resource: Resource,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        self.rate_limiters.wait_for(resource).await;

        let url = format!("{}{}", self.api_root, path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url).query(query);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                self.rate_limiters.activate(resource);
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_client_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                Err(ApiError::Rejected(status.as_u16(), error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

/// Client for one resource group. Paths are relative to the group's base path.
#[derive(Clone)]
pub struct ResourceClient {
    resource: Resource,
    transport: Arc<Transport>,
}

impl ResourceClient {
    pub fn new(resource: Resource, transport: Arc<Transport>) -> Self {
        Self {
            resource,
            transport,
        }
    }

    /// Full URL for a path in this group
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.transport.api_root(),
            self.resource.base_path(),
            path
        )
    }

    fn path(&self, path: &str) -> String {
        format!("{}{}", self.resource.base_path(), path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.transport
            .request(self.resource, Method::GET, &self.path(path), query, None)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.transport
            .request(self.resource, Method::POST, &self.path(path), &[], Some(body))
            .await
    }

    pub async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.transport
            .request_empty(self.resource, Method::POST, &self.path(path), &[], Some(body))
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.transport
            .request(self.resource, Method::PATCH, &self.path(path), &[], Some(body))
            .await
    }
}
