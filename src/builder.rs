use std::sync::Arc;
use std::time::Duration;

use crate::core::config::KucoinConfig;
use crate::core::errors::KucoinError;
use crate::core::kernel::{KucoinSigner, ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::rest::{FuturesRestClient, WebsocketMetaApi};
use crate::ws::{FuturesWsClient, WsClientConfig};

/// Default production REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api-futures.kucoin.com";

/// Builder assembling credentials and endpoints into REST and WebSocket
/// client instances sharing the same credential set.
///
/// Every built client is an owned value; the builder holds no global state.
pub struct FuturesClientBuilder {
    config: KucoinConfig,
    rest_timeout: u64,
    ws_config: WsClientConfig,
}

impl Default for FuturesClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FuturesClientBuilder {
    /// Create a new builder with default settings and no credentials.
    pub fn new() -> Self {
        Self {
            config: KucoinConfig::read_only(),
            rest_timeout: 30,
            ws_config: WsClientConfig::default(),
        }
    }

    /// Use an existing configuration.
    pub fn with_config(mut self, config: KucoinConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials for authenticated endpoints and private channels.
    pub fn with_credentials(
        mut self,
        api_key: String,
        secret_key: String,
        passphrase: String,
    ) -> Self {
        let base_url = self.config.base_url.clone();
        self.config = KucoinConfig::new(api_key, secret_key, passphrase);
        self.config.base_url = base_url;
        self
    }

    /// Set the REST base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set the REST request timeout in seconds.
    pub fn with_rest_timeout(mut self, timeout_seconds: u64) -> Self {
        self.rest_timeout = timeout_seconds;
        self
    }

    /// Set the WebSocket per-endpoint connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.ws_config.connect_timeout = timeout;
        self
    }

    /// Set the maximum number of redial attempts after an unexpected drop.
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.ws_config.max_reconnect_attempts = attempts;
        self
    }

    fn base_url(&self) -> Result<String, KucoinError> {
        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if base_url.is_empty() {
            return Err(KucoinError::InvalidParameters(
                "base URL must not be empty".to_string(),
            ));
        }
        Ok(base_url)
    }

    fn build_transport(&self) -> Result<ReqwestRest, KucoinError> {
        let rest_config =
            RestClientConfig::new(self.base_url()?).with_timeout(self.rest_timeout);
        let mut rest_builder = RestClientBuilder::new(rest_config);

        if self.config.has_credentials() {
            let signer = Arc::new(KucoinSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
                self.config.passphrase().to_string(),
            ));
            rest_builder = rest_builder.with_signer(signer);
        }

        rest_builder.build()
    }

    /// Build the REST client covering every API group.
    pub fn build_rest_client(&self) -> Result<FuturesRestClient, KucoinError> {
        Ok(FuturesRestClient::new(self.build_transport()?))
    }

    /// Build a WebSocket client for the private channels. Requires
    /// credentials: the bootstrap call is signed.
    pub fn build_private_ws_client(&self) -> Result<FuturesWsClient, KucoinError> {
        if !self.config.has_credentials() {
            return Err(KucoinError::AuthError(
                "private WebSocket client requires API credentials".to_string(),
            ));
        }

        let meta = WebsocketMetaApi::new(self.build_transport()?);
        Ok(FuturesWsClient::new(meta, true, self.ws_config.clone()))
    }

    /// Build a WebSocket client for the public channels. No credentials
    /// needed.
    pub fn build_public_ws_client(&self) -> Result<FuturesWsClient, KucoinError> {
        let meta = WebsocketMetaApi::new(self.build_transport()?);
        Ok(FuturesWsClient::new(meta, false, self.ws_config.clone()))
    }
}
