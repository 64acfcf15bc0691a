use thiserror::Error;

#[derive(Error, Debug)]
pub enum KucoinError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error-coded payload from the exchange. KuCoin codes are strings,
    /// "200000" being success.
    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Ping timeout: no pong received for request id {0}")]
    PingTimeout(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}
