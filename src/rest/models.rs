use crate::core::errors::KucoinError;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success code used by the exchange in every REST envelope.
pub const SUCCESS_CODE: &str = "200000";

/// KuCoin REST envelope. Every endpoint wraps its payload in
/// `{"code":"200000","data":...}`; any other code is an API error.
#[derive(Debug, Deserialize, Serialize)]
pub struct RestResponse<T> {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Unwrap a raw envelope into its `data` payload, mapping error codes to
/// [`KucoinError::ApiError`].
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> Result<T, KucoinError> {
    let envelope: RestResponse<Value> = serde_json::from_value(value)?;

    if envelope.code != SUCCESS_CODE {
        return Err(KucoinError::ApiError {
            code: envelope.code,
            message: envelope.msg.unwrap_or_default(),
        });
    }

    let data = envelope.data.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(KucoinError::from)
}

/// Time-window paging filter shared by the history endpoints. All fields are
/// optional; adapters substitute `DuringRequest::default()` when the caller
/// passes `None`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuringRequest {
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    pub offset: Option<i64>,
    pub max_count: Option<i32>,
}

impl DuringRequest {
    /// Append the present fields as query parameters.
    pub(crate) fn push_params(&self, params: &mut Vec<(String, String)>) {
        if let Some(start_at) = self.start_at {
            params.push(("startAt".to_string(), start_at.to_string()));
        }
        if let Some(end_at) = self.end_at {
            params.push(("endAt".to_string(), end_at.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(max_count) = self.max_count {
            params.push(("maxCount".to_string(), max_count.to_string()));
        }
    }
}

/// Offset-paged response (`hasMore` style endpoints).
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasMoreResponse<T> {
    pub has_more: bool,
    pub data_list: Vec<T>,
}

/// Page-numbered response (order list style endpoints).
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub current_page: u32,
    pub page_size: u32,
    pub total_num: u64,
    pub total_page: u64,
    pub items: Vec<T>,
}

/// Order placement request. Optional fields are omitted from the wire body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub client_oid: String,
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub leverage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateResponse {
    pub order_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelResponse {
    pub cancelled_order_ids: Vec<String>,
}

/// Order details as returned by the order query endpoints.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    pub price: Option<Decimal>,
    pub size: Option<Decimal>,
    pub deal_size: Option<Decimal>,
    pub deal_value: Option<Decimal>,
    pub leverage: Option<String>,
    pub stop: Option<String>,
    pub stop_price: Option<Decimal>,
    pub stop_price_type: Option<String>,
    pub client_oid: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Filter for the order list endpoint. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct OrderListRequest {
    pub symbol: Option<String>,
    pub status: Option<String>,
    pub side: Option<String>,
    pub order_type: Option<String>,
    pub during: DuringRequest,
}

impl OrderListRequest {
    pub(crate) fn push_params(&self, params: &mut Vec<(String, String)>) {
        if let Some(symbol) = &self.symbol {
            params.push(("symbol".to_string(), symbol.clone()));
        }
        if let Some(status) = &self.status {
            params.push(("status".to_string(), status.clone()));
        }
        if let Some(side) = &self.side {
            params.push(("side".to_string(), side.clone()));
        }
        if let Some(order_type) = &self.order_type {
            params.push(("type".to_string(), order_type.clone()));
        }
        self.during.push_params(params);
    }
}

/// One settled funding fee entry.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryItem {
    pub id: i64,
    pub symbol: String,
    pub time_point: i64,
    pub funding_rate: Decimal,
    pub mark_price: Decimal,
    pub position_qty: Decimal,
    pub position_cost: Decimal,
    pub funding: Decimal,
    pub settle_currency: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FundingRate {
    pub symbol: String,
    pub granularity: i64,
    pub time_point: i64,
    pub value: Decimal,
    pub predicted_value: Option<Decimal>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarkPrice {
    pub symbol: String,
    pub granularity: i64,
    pub time_point: i64,
    pub value: Decimal,
    pub index_price: Option<Decimal>,
}

/// Index value with its per-exchange decomposition.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub symbol: String,
    pub granularity: i64,
    pub time_point: i64,
    pub value: Decimal,
    #[serde(default)]
    pub decomposition_list: Vec<IndexItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IndexItem {
    pub exchange: String,
    pub price: Decimal,
    pub weight: Decimal,
}

/// WebSocket bootstrap payload: short-lived token plus the gateway endpoints
/// to dial, with their heartbeat settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BulletResponse {
    pub token: String,
    pub instance_servers: Vec<InstanceServer>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceServer {
    pub endpoint: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub encrypt: Option<bool>,
    /// Heartbeat interval in milliseconds.
    pub ping_interval: u64,
    /// Time to wait for a pong in milliseconds.
    pub ping_timeout: u64,
}
