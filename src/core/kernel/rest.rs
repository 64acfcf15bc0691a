use crate::core::errors::KucoinError;
use crate::core::kernel::signer::Signer;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{instrument, trace};

/// REST client trait for making HTTP requests
///
/// Each call is independent and at-most-once: there are no retries and no
/// batching. Authentication, when requested, is delegated to the configured
/// [`Signer`].
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    /// * `authenticated` - Whether to sign the request
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, KucoinError>;

    /// Make a POST request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `body` - Request body as JSON value
    /// * `authenticated` - Whether to sign the request
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, KucoinError>;

    /// Make a DELETE request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    /// * `authenticated` - Whether to sign the request
    async fn delete(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, KucoinError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_seconds: 30,
            user_agent: "kucoin-futures-rs/0.1".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, KucoinError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| KucoinError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Get the current timestamp in milliseconds
    fn get_timestamp() -> Result<u64, KucoinError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| KucoinError::Other(format!("Failed to get timestamp: {}", e)))
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Create query string from parameters
    fn create_query_string(params: &[(&str, &str)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Handle the response and extract JSON
    #[instrument(skip(self, response), fields(status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, KucoinError> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| KucoinError::NetworkError(format!("Failed to read response body: {}", e)))?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                KucoinError::Other(format!("Failed to parse JSON response: {}", e))
            })
        } else {
            Err(KucoinError::ApiError {
                code: status.as_u16().to_string(),
                message: response_text,
            })
        }
    }

    /// Make a request with the given parameters
    #[instrument(skip(self, body), fields(method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<Value, KucoinError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.request(method.clone(), &url);

        let query_string = Self::create_query_string(query_params);

        if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                KucoinError::AuthError(
                    "Authentication required but no signer provided".to_string(),
                )
            })?;

            let timestamp = Self::get_timestamp()?;
            let (headers, signed_params) =
                signer.sign_request(method.as_str(), endpoint, &query_string, body, timestamp)?;

            for (key, value) in headers {
                request = request.header(&key, &value);
            }

            for (key, value) in signed_params {
                request = request.query(&[(key, value)]);
            }
        } else {
            for (key, value) in query_params {
                request = request.query(&[(key, value)]);
            }
        }

        if !body.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body.to_vec());
        }

        let response = request
            .send()
            .await
            .map_err(|e| KucoinError::NetworkError(format!("Request failed: {}", e)))?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, KucoinError> {
        self.make_request(Method::GET, endpoint, query_params, &[], authenticated)
            .await
    }

    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, KucoinError> {
        let body_bytes = serde_json::to_vec(body).map_err(|e| {
            KucoinError::Other(format!("Failed to serialize request body: {}", e))
        })?;

        self.make_request(Method::POST, endpoint, &[], &body_bytes, authenticated)
            .await
    }

    #[instrument(skip(self, query_params), fields(endpoint = %endpoint, param_count = query_params.len()))]
    async fn delete(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, KucoinError> {
        self.make_request(Method::DELETE, endpoint, query_params, &[], authenticated)
            .await
    }
}
