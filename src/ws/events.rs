//! Typed payloads for the WebSocket channels.
//!
//! Field sets follow the exchange's wire schema; prices and sizes are
//! [`Decimal`] and timestamps are epoch values as sent by the gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade ticker: best bid/ask plus the last execution.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TickerEvent {
    pub symbol: String,
    pub sequence: i64,
    pub side: String,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub best_bid_price: Option<Decimal>,
    #[serde(default)]
    pub best_bid_size: Option<Decimal>,
    #[serde(default)]
    pub best_ask_price: Option<Decimal>,
    #[serde(default)]
    pub best_ask_size: Option<Decimal>,
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Incremental level 2 change. `change` is the raw "price,side,quantity"
/// triple as sent by the exchange.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Level2ChangeEvent {
    pub sequence: i64,
    pub change: String,
    pub timestamp: i64,
}

/// Depth-5 / depth-50 order book snapshot.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Level2OrderBookEvent {
    pub asks: Vec<(Decimal, Decimal)>,
    pub bids: Vec<(Decimal, Decimal)>,
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Full order-flow event on the level 3 feeds. The populated fields depend
/// on the subject (received, open, update, match, done).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Level3Event {
    pub symbol: String,
    pub sequence: i64,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub maker_order_id: Option<String>,
    #[serde(default)]
    pub taker_order_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub order_time: Option<i64>,
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Contract instrument push: a mark/index price tick or a funding rate
/// update, depending on the frame subject.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentEvent {
    pub granularity: i64,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub index_price: Option<Decimal>,
    #[serde(default)]
    pub funding_rate: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Match execution.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionChangeEvent {
    pub symbol: String,
    pub sequence: i64,
    pub side: String,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub maker_order_id: Option<String>,
    #[serde(default)]
    pub taker_order_id: Option<String>,
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Account balance change on the wallet feed. The populated fields depend on
/// the frame subject (order margin change vs. available balance change).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountChangeEvent {
    pub currency: String,
    #[serde(default)]
    pub order_margin: Option<Decimal>,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
    #[serde(default)]
    pub hold_balance: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Position change push.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PositionChangeEvent {
    pub symbol: String,
    #[serde(default)]
    pub current_qty: Option<Decimal>,
    #[serde(default)]
    pub current_cost: Option<Decimal>,
    #[serde(default)]
    pub avg_entry_price: Option<Decimal>,
    #[serde(default)]
    pub liquidation_price: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub unrealised_pnl: Option<Decimal>,
    #[serde(default)]
    pub realised_pnl: Option<Decimal>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub current_timestamp: Option<i64>,
}

/// Lifecycle event for the caller's own orders.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrderEvent {
    pub order_id: String,
    pub symbol: String,
    /// open, match, filled, canceled or update.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub remain_size: Option<Decimal>,
    #[serde(default)]
    pub fill_size: Option<Decimal>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub order_time: Option<i64>,
    #[serde(default)]
    pub ts: Option<i64>,
}

/// Lifecycle event for stop orders: triggered, cancelled, or failed to fire.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StopOrderLifecycleEvent {
    pub order_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub order_price: Option<Decimal>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub stop_price_type: Option<String>,
    #[serde(default)]
    pub trigger_success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub ts: Option<i64>,
}
