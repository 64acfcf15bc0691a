use crate::core::errors::KucoinError;
use crate::core::kernel::RestClient;
use crate::rest::models::{
    unwrap_envelope, DuringRequest, FundingHistoryItem, FundingRate, HasMoreResponse,
};

/// Funding fee endpoints.
#[derive(Debug, Clone)]
pub struct FundingApi<R: RestClient> {
    rest: R,
}

impl<R: RestClient> FundingApi<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    /// Fetch the settled funding fee history for a symbol.
    ///
    /// `request` is a nullable time-window filter; a default (unbounded) one
    /// is substituted when absent.
    pub async fn funding_history(
        &self,
        symbol: &str,
        reverse: Option<bool>,
        forward: Option<bool>,
        request: Option<DuringRequest>,
    ) -> Result<HasMoreResponse<FundingHistoryItem>, KucoinError> {
        let request = request.unwrap_or_default();

        let mut params = vec![("symbol".to_string(), symbol.to_string())];
        if let Some(reverse) = reverse {
            params.push(("reverse".to_string(), reverse.to_string()));
        }
        if let Some(forward) = forward {
            params.push(("forward".to_string(), forward.to_string()));
        }
        request.push_params(&mut params);

        let borrowed: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let value = self
            .rest
            .get("/api/v1/funding-history", &borrowed, true)
            .await?;
        unwrap_envelope(value)
    }

    /// Fetch the current funding rate for a symbol.
    pub async fn current_funding_rate(&self, symbol: &str) -> Result<FundingRate, KucoinError> {
        let endpoint = format!("/api/v1/funding-rate/{}/current", symbol);
        let value = self.rest.get(&endpoint, &[], false).await?;
        unwrap_envelope(value)
    }
}
