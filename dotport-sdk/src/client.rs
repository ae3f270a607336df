//! HTTP transport for the portal SDK.
//!
//! Wraps `reqwest` with per-request bearer tokens, bounded retries with
//! exponential backoff, and optional request/response logging.

use std::fmt;
use std::sync::Arc;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::auth::TokenProvider;
use crate::config::PortalConfig;
use crate::error::{PortalError, PortalResult};

/// The HTTP client every portal call goes through.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<PortalConfig>,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Build a client from a validated configuration and token source.
    pub fn new(config: PortalConfig, tokens: Arc<dyn TokenProvider>) -> PortalResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(PortalError::Network)?;

        Ok(Self {
            client,
            config: Arc::new(config),
            tokens,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Full URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// GET a JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PortalResult<T> {
        self.request(Method::GET, path, Option::<&()>::None, None).await
    }

    /// GET a JSON response with query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> PortalResult<T> {
        self.request(Method::GET, path, Option::<&()>::None, Some(query)).await
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PortalResult<T> {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// PATCH a JSON body and parse the JSON response.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PortalResult<T> {
        self.request(Method::PATCH, path, Some(body), None).await
    }

    /// DELETE, expecting an empty success response.
    pub async fn delete(&self, path: &str) -> PortalResult<()> {
        let response = self
            .execute_with_retry(Method::DELETE, path, Option::<&()>::None, None)
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.map_err(PortalError::Network)?;
        Err(self.handle_error_response(status, &body))
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&[(&str, String)]>,
    ) -> PortalResult<T> {
        let response = self.execute_with_retry(method, path, body, query).await?;

        let status = response.status();
        let text = response.text().await.map_err(PortalError::Network)?;

        if self.config.enable_logging {
            debug!("Response ({}): {}", status, text);
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(PortalError::Serialization)
        } else {
            Err(self.handle_error_response(status, &text))
        }
    }

    async fn execute_with_retry<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&[(&str, String)]>,
    ) -> PortalResult<Response> {
        let url = self.url(path);
        let body_json = match body {
            Some(body) => Some(serde_json::to_string(body).map_err(PortalError::Serialization)?),
            None => None,
        };

        let mut attempts: u32 = 0;
        let mut backoff = self.config.retry_initial_backoff;
        let mut last_error: Option<PortalError> = None;

        while attempts <= self.config.max_retries {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            // Tokens are fetched per attempt so a provider can rotate them.
            // A provider failure is not retried.
            let token = self.tokens.bearer_token().await?;

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header(header::AUTHORIZATION, format!("Bearer {}", token));

            if let Some(query) = query {
                request = request.query(query);
            }

            if let Some(body) = &body_json {
                request = request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            if self.config.enable_logging {
                debug!("Request: {} {}", method, url);
                if let Some(body) = &body_json {
                    debug!("Request body: {}", body);
                }
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() && attempts < self.config.max_retries {
                        warn!("Server error {}, will retry", status);
                        last_error = Some(PortalError::Server(format!("Status: {}", status)));
                        attempts += 1;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    error!("Request failed: {}", e);

                    if e.is_timeout() {
                        last_error = Some(PortalError::Timeout(self.config.timeout.as_secs()));
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(PortalError::Network(e));
                    } else {
                        return Err(PortalError::Network(e));
                    }

                    attempts += 1;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| PortalError::Server("request failed with no response".to_string())))
    }

    fn handle_error_response(&self, status: StatusCode, body: &str) -> PortalError {
        match status {
            StatusCode::UNAUTHORIZED => {
                PortalError::Authentication("invalid or missing bearer token".to_string())
            }
            StatusCode::FORBIDDEN => {
                PortalError::Authorization("access denied for this entity".to_string())
            }
            _ => PortalError::from_response(status.as_u16(), body),
        }
    }
}
