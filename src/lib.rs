//! KuCoin Futures client SDK.
//!
//! REST endpoints (orders, funding fees, index and mark price) plus a
//! WebSocket client for the exchange's event gateway. Start with
//! [`FuturesClientBuilder`]:
//!
//! ```rust,no_run
//! use kucoin_futures::builder::FuturesClientBuilder;
//!
//! # async fn example() -> Result<(), kucoin_futures::KucoinError> {
//! let builder = FuturesClientBuilder::new().with_credentials(
//!     "api_key".to_string(),
//!     "api_secret".to_string(),
//!     "passphrase".to_string(),
//! );
//!
//! let rest = builder.build_rest_client()?;
//! let mark_price = rest.index.current_mark_price("XBTUSDM").await?;
//! println!("mark price: {}", mark_price.value);
//!
//! let ws = builder.build_private_ws_client()?;
//! ws.connect().await?;
//! ws.on_ticker(|event| println!("{}: {}", event.data.symbol, event.data.price), "XBTUSDM")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod rest;
pub mod ws;

pub use builder::FuturesClientBuilder;
pub use core::config::KucoinConfig;
pub use core::errors::KucoinError;
pub use rest::FuturesRestClient;
pub use ws::{Channel, ConnectionState, FuturesWsClient, WsEvent};
