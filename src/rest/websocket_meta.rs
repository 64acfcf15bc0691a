use crate::core::errors::KucoinError;
use crate::core::kernel::RestClient;
use crate::rest::models::{unwrap_envelope, BulletResponse};
use serde_json::json;

/// WebSocket bootstrap ("bullet") endpoints.
///
/// The gateway requires a short-lived token obtained over REST before a
/// socket can be opened; the response also carries the endpoint list and
/// heartbeat settings.
#[derive(Debug, Clone)]
pub struct WebsocketMetaApi<R: RestClient> {
    rest: R,
}

impl<R: RestClient> WebsocketMetaApi<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    /// Request bootstrap data for the public channels. No credentials needed.
    pub async fn bullet_public(&self) -> Result<BulletResponse, KucoinError> {
        let value = self
            .rest
            .post("/api/v1/bullet-public", &json!({}), false)
            .await?;
        unwrap_envelope(value)
    }

    /// Request bootstrap data for the private channels. Signed.
    pub async fn bullet_private(&self) -> Result<BulletResponse, KucoinError> {
        let value = self
            .rest
            .post("/api/v1/bullet-private", &json!({}), true)
            .await?;
        unwrap_envelope(value)
    }
}
