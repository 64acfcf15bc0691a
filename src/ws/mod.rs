//! WebSocket client: subscription registry, event dispatch and heartbeat
//! over the exchange's token-bootstrapped gateway.

pub mod channel;
pub mod client;
pub mod events;
pub mod frame;

pub use channel::Channel;
pub use client::{ConnectionState, FuturesWsClient, WsClientConfig};
pub use events::{
    AccountChangeEvent, ExecutionChangeEvent, InstrumentEvent, Level2ChangeEvent,
    Level2OrderBookEvent, Level3Event, PositionChangeEvent, StopOrderLifecycleEvent, TickerEvent,
    TradeOrderEvent,
};
pub use frame::WsEvent;
