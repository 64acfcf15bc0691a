use crate::core::errors::KucoinError;
use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), KucoinError>;

/// Signer trait for request authentication
///
/// Implementations produce the headers (and optionally rewritten query
/// parameters) required to authenticate a request against the exchange.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Query string (without leading '?')
    /// * `body` - Raw request body bytes
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// KC-API v2 request signer.
///
/// The prehash string is `timestamp + METHOD + requestPath + body` where the
/// request path includes the query string when present. Signatures are
/// HMAC-SHA256 with the API secret, base64-encoded. The passphrase header is
/// itself signed the same way (key version 2).
pub struct KucoinSigner {
    api_key: String,
    secret_key: Secret<String>,
    passphrase: Secret<String>,
}

impl KucoinSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
        }
    }

    fn hmac_base64(&self, payload: &[u8]) -> Result<String, KucoinError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| KucoinError::AuthError(format!("Failed to create HMAC: {}", e)))?;

        mac.update(payload);
        let signature_bytes = mac.finalize().into_bytes();

        Ok(general_purpose::STANDARD.encode(signature_bytes))
    }
}

impl Signer for KucoinSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };

        let body_str = std::str::from_utf8(body)
            .map_err(|e| KucoinError::AuthError(format!("Invalid body encoding: {}", e)))?;

        let prehash = format!("{}{}{}{}", timestamp, method, request_path, body_str);
        let signature = self.hmac_base64(prehash.as_bytes())?;
        let signed_passphrase = self.hmac_base64(self.passphrase.expose_secret().as_bytes())?;

        let mut headers = HashMap::new();
        headers.insert("KC-API-KEY".to_string(), self.api_key.clone());
        headers.insert("KC-API-SIGN".to_string(), signature);
        headers.insert("KC-API-TIMESTAMP".to_string(), timestamp.to_string());
        headers.insert("KC-API-PASSPHRASE".to_string(), signed_passphrase);
        headers.insert("KC-API-KEY-VERSION".to_string(), "2".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        // Query parameters are part of the signed request path; pass them
        // through unchanged.
        let query_params = if query_string.is_empty() {
            Vec::new()
        } else {
            query_string
                .split('&')
                .filter_map(|param| {
                    param
                        .split_once('=')
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect()
        };

        Ok((headers, query_params))
    }
}
