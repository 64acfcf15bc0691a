use crate::core::errors::KucoinError;
use crate::core::kernel::RestClient;
use crate::rest::models::{
    unwrap_envelope, OrderCancelResponse, OrderCreateRequest, OrderCreateResponse,
    OrderListRequest, OrderResponse, Pagination,
};

/// Order placement, cancellation and query endpoints.
///
/// Every method is a single synchronous call against the exchange; there are
/// no retries and no batching.
#[derive(Debug, Clone)]
pub struct OrderApi<R: RestClient> {
    rest: R,
}

impl<R: RestClient> OrderApi<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    /// Place an order.
    pub async fn create_order(
        &self,
        request: OrderCreateRequest,
    ) -> Result<OrderCreateResponse, KucoinError> {
        if request.client_oid.is_empty() {
            return Err(KucoinError::InvalidParameters(
                "clientOid is required".to_string(),
            ));
        }

        let body = serde_json::to_value(&request)?;
        let value = self.rest.post("/api/v1/orders", &body, true).await?;
        unwrap_envelope(value)
    }

    /// Cancel a single order by its exchange-assigned id.
    pub async fn cancel_order(&self, order_id: &str) -> Result<OrderCancelResponse, KucoinError> {
        let endpoint = format!("/api/v1/orders/{}", order_id);
        let value = self.rest.delete(&endpoint, &[], true).await?;
        unwrap_envelope(value)
    }

    /// Cancel all open limit orders for a symbol.
    pub async fn cancel_all_limit_orders(
        &self,
        symbol: &str,
    ) -> Result<OrderCancelResponse, KucoinError> {
        let value = self
            .rest
            .delete("/api/v1/orders", &[("symbol", symbol)], true)
            .await?;
        unwrap_envelope(value)
    }

    /// Cancel all untriggered stop orders for a symbol.
    pub async fn cancel_all_stop_orders(
        &self,
        symbol: &str,
    ) -> Result<OrderCancelResponse, KucoinError> {
        let value = self
            .rest
            .delete("/api/v1/stopOrders", &[("symbol", symbol)], true)
            .await?;
        unwrap_envelope(value)
    }

    /// Fetch a single order by its exchange-assigned id.
    pub async fn get_order(&self, order_id: &str) -> Result<OrderResponse, KucoinError> {
        let endpoint = format!("/api/v1/orders/{}", order_id);
        let value = self.rest.get(&endpoint, &[], true).await?;
        unwrap_envelope(value)
    }

    /// List orders, paged. A `None` filter lists everything.
    pub async fn list_orders(
        &self,
        request: Option<OrderListRequest>,
    ) -> Result<Pagination<OrderResponse>, KucoinError> {
        let request = request.unwrap_or_default();
        let mut params = Vec::new();
        request.push_params(&mut params);

        let borrowed: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let value = self.rest.get("/api/v1/orders", &borrowed, true).await?;
        unwrap_envelope(value)
    }
}
