//! Dashboard API client
//!
//! Provides a typed HTTP client for the dashboard's REST backend.

use crate::auth::SharedSession;
use crate::config::{ApiConfig, VerifyMethod};
use crate::error::{ApiError, ApiResult};
use crate::util::SecretString;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Dashboard API client
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SharedSession,
    max_retries: u32,
}

impl ApiClient {
    /// Create a new client from configuration
    ///
    /// Requests carry the session's token as a bearer credential whenever
    /// one is stored.
    pub fn new(config: &ApiConfig, session: SharedSession) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(format!("taskboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            session,
            max_retries: config.max_retries,
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add the stored bearer token to a request, if any
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Ok(Some(token)) => request.bearer_auth(token.expose_secret()),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "Failed to read session, sending request unauthenticated");
                request
            }
        }
    }

    /// Execute a request with retries
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!("Retrying request (attempt {})", attempt + 1);
            }

            let req = request
                .try_clone()
                .ok_or_else(|| ApiError::InvalidResponse("Cannot clone request".to_string()))?;

            let result = match req.send().await {
                Ok(response) => self.handle_response(response).await,
                Err(e) => Err(ApiError::Request(e)),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if is_retryable(&e) => {
                    warn!("Request failed: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::InvalidResponse("Unknown error".to_string())))
    }

    /// Handle API response
    async fn handle_response(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited { retry_after: 60 });
        }

        Err(ApiError::from_response(status.as_u16(), &body))
    }

    /// Read a response body as JSON; an empty body is `null`
    async fn read_json(response: Response) -> ApiResult<Value> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let request = self.authenticate(self.http.get(self.url(endpoint)));

        let response = self.execute(request).await?;
        let data = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(data)
    }

    /// GET a list wrapped in the backend's `{"data": [...]}` envelope
    ///
    /// A missing or non-array `data` field reads as an empty list.
    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Vec<T>> {
        let body: Value = self.get(endpoint).await?;
        match body.get("data") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    serde_json::from_value(item.clone()).map_err(|e| {
                        ApiError::InvalidResponse(format!("Unexpected item in {}: {}", endpoint, e))
                    })
                })
                .collect(),
            _ => {
                debug!(endpoint, "Response has no data array, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Make a POST request returning the raw JSON value
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<Value> {
        let request = self.authenticate(self.http.post(self.url(endpoint)).json(body));

        let response = self.execute(request).await?;
        Self::read_json(response).await
    }

    /// Make a PUT request returning the raw JSON value
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<Value> {
        let request = self.authenticate(self.http.put(self.url(endpoint)).json(body));

        let response = self.execute(request).await?;
        Self::read_json(response).await
    }

    /// Make a DELETE request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        let request = self.authenticate(self.http.delete(self.url(endpoint)));

        self.execute(request).await?;
        Ok(())
    }

    /// Ask the backend whether `token` is valid
    ///
    /// Sends exactly one request, carrying `token` rather than whatever the
    /// session holds, and returns the raw body for validation by the caller.
    #[instrument(skip(self, token), fields(endpoint = %endpoint))]
    pub async fn check_token(
        &self,
        method: VerifyMethod,
        endpoint: &str,
        token: &SecretString,
    ) -> ApiResult<Vec<u8>> {
        let url = self.url(endpoint);
        let request = match method {
            VerifyMethod::Post => self.http.post(&url).json(&serde_json::json!({})),
            VerifyMethod::Get => self.http.get(&url),
        };

        let response = request.bearer_auth(token.expose_secret()).send().await?;
        let response = self.handle_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Check if an error is retryable
fn is_retryable(error: &ApiError) -> bool {
    match error {
        ApiError::Request(e) => e.is_timeout() || e.is_connect(),
        ApiError::RateLimited { .. } => true,
        ApiError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}
