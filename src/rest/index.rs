use crate::core::errors::KucoinError;
use crate::core::kernel::RestClient;
use crate::rest::models::{unwrap_envelope, DuringRequest, HasMoreResponse, Index, MarkPrice};

/// Index and mark price endpoints. All public.
#[derive(Debug, Clone)]
pub struct IndexApi<R: RestClient> {
    rest: R,
}

impl<R: RestClient> IndexApi<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    /// Fetch the current mark price for a symbol.
    pub async fn current_mark_price(&self, symbol: &str) -> Result<MarkPrice, KucoinError> {
        let endpoint = format!("/api/v1/mark-price/{}/current", symbol);
        let value = self.rest.get(&endpoint, &[], false).await?;
        unwrap_envelope(value)
    }

    /// Fetch historical index values, including the per-exchange
    /// decomposition of each value.
    pub async fn index_list(
        &self,
        symbol: &str,
        reverse: Option<bool>,
        forward: Option<bool>,
        request: Option<DuringRequest>,
    ) -> Result<HasMoreResponse<Index>, KucoinError> {
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
        let value = self.rest.get("/api/v1/index/query", &borrowed, false).await?;
        unwrap_envelope(value)
    }
}
