use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// API credentials and endpoint configuration shared by the REST and
/// WebSocket clients. Immutable after construction.
#[derive(Debug, Clone)]
pub struct KucoinConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Secret<String>,
    pub base_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for KucoinConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("KucoinConfig", 4)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("passphrase", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for KucoinConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct KucoinConfigHelper {
            api_key: String,
            secret_key: String,
            passphrase: String,
            base_url: Option<String>,
        }

        let helper = KucoinConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: Secret::new(helper.passphrase),
            base_url: helper.base_url,
        })
    }
}

impl KucoinConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
            base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `KUCOIN_FUTURES_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY`
    /// - `{PREFIX}_PASSPHRASE`
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let api_key_var = format!("{}_API_KEY", prefix.to_uppercase());
        let secret_key_var = format!("{}_SECRET_KEY", prefix.to_uppercase());
        let passphrase_var = format!("{}_PASSPHRASE", prefix.to_uppercase());
        let base_url_var = format!("{}_BASE_URL", prefix.to_uppercase());

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let passphrase = env::var(&passphrase_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(passphrase_var))?;

        let base_url = env::var(&base_url_var).ok();

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
            base_url,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// Loads environment variables from a .env file first (if it exists),
    /// then reads the configuration using the standard variable names.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Create configuration for read-only operations (public endpoints and
    /// public WebSocket channels). No credentials required.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            secret_key: Secret::new(String::new()),
            passphrase: Secret::new(String::new()),
            base_url: None,
        }
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get API passphrase (use carefully - exposes secret)
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
