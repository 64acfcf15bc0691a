use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, instrument, warn};

use crate::core::errors::KucoinError;
use crate::core::kernel::ReqwestRest;
use crate::rest::models::{BulletResponse, InstanceServer};
use crate::rest::WebsocketMetaApi;
use crate::ws::channel::{split_topic, Channel};
use crate::ws::events::{
    AccountChangeEvent, ExecutionChangeEvent, InstrumentEvent, Level2ChangeEvent,
    Level2OrderBookEvent, Level3Event, PositionChangeEvent, StopOrderLifecycleEvent, TickerEvent,
    TradeOrderEvent,
};
use crate::ws::frame::{InboundFrame, PingFrame, SubscribeFrame, WsEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type Callback = Arc<dyn Fn(&InboundFrame) + Send + Sync>;
type SubscriptionKey = (Channel, Option<String>);

/// WebSocket client configuration. Heartbeat settings come from the
/// bootstrap response, not from here.
#[derive(Debug, Clone)]
pub struct WsClientConfig {
    /// Per-endpoint connection timeout.
    pub connect_timeout: Duration,
    /// Max redial attempts after an unexpected disconnect.
    pub max_reconnect_attempts: u32,
    /// Initial delay between redial attempts; doubled per attempt, capped at 60s.
    pub reconnect_delay: Duration,
}

impl Default for WsClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

/// Connection lifecycle. Owned exclusively by the client; callbacks never
/// mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

struct Inner {
    meta: WebsocketMetaApi<ReqwestRest>,
    private: bool,
    config: WsClientConfig,
    state: Mutex<ConnectionState>,
    registry: Mutex<HashMap<SubscriptionKey, Callback>>,
    pending_pongs: Mutex<HashMap<String, oneshot::Sender<()>>>,
    sink: AsyncMutex<Option<WsSink>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    ping_interval_ms: AtomicU64,
    ping_timeout_ms: AtomicU64,
}

/// Client for the exchange's event gateway.
///
/// One logical connection per client. Callers register typed callbacks per
/// channel; inbound frames are routed to the callbacks whose
/// `(channel, symbol)` key matches, with channel-only registrations acting
/// as a fallback for every symbol.
pub struct FuturesWsClient {
    inner: Arc<Inner>,
}

fn next_id() -> String {
    rand::random::<u64>().to_string()
}

/// Bootstrap endpoints arrive with or without a trailing slash; the query
/// must hang off an explicit path or the handshake request line is
/// malformed.
fn dial_url(endpoint: &str, token: &str) -> String {
    format!(
        "{}/?token={}&connectId={}",
        endpoint.trim_end_matches('/'),
        token,
        next_id()
    )
}

fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn state(&self) -> ConnectionState {
        *lock_ignore_poison(&self.state)
    }

    fn set_state(&self, state: ConnectionState) {
        *lock_ignore_poison(&self.state) = state;
    }

    async fn send_raw(&self, message: Message) -> Result<(), KucoinError> {
        let mut sink = self.sink.lock().await;
        let sink = sink
            .as_mut()
            .ok_or_else(|| KucoinError::NetworkError("WebSocket not connected".to_string()))?;
        sink.send(message)
            .await
            .map_err(|e| KucoinError::NetworkError(format!("Failed to send frame: {}", e)))
    }

    async fn send_json<T: Serialize>(&self, frame: &T) -> Result<(), KucoinError> {
        let text = serde_json::to_string(frame)?;
        self.send_raw(Message::Text(text)).await
    }

    async fn bootstrap(&self) -> Result<BulletResponse, KucoinError> {
        if self.private {
            self.meta.bullet_private().await
        } else {
            self.meta.bullet_public().await
        }
    }

    /// Dial the instance servers in order; first reachable endpoint wins.
    /// Returns the server that accepted alongside the stream so its
    /// heartbeat settings can be applied.
    async fn dial(
        &self,
        bullet: &BulletResponse,
    ) -> Result<(WsStream, InstanceServer), KucoinError> {
        if bullet.instance_servers.is_empty() {
            return Err(KucoinError::NetworkError(
                "bootstrap returned no instance servers".to_string(),
            ));
        }

        let mut last_error = None;
        for server in &bullet.instance_servers {
            let url = dial_url(&server.endpoint, &bullet.token);

            match timeout(self.config.connect_timeout, connect_async(url.as_str())).await {
                Ok(Ok((stream, _))) => return Ok((stream, server.clone())),
                Ok(Err(e)) => {
                    warn!(endpoint = %server.endpoint, "connection failed: {}", e);
                    last_error = Some(KucoinError::NetworkError(format!(
                        "connection to {} failed: {}",
                        server.endpoint, e
                    )));
                }
                Err(_) => {
                    warn!(endpoint = %server.endpoint, "connection timed out");
                    last_error = Some(KucoinError::ConnectionTimeout(format!(
                        "timed out connecting to {}",
                        server.endpoint
                    )));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| KucoinError::NetworkError("no endpoint reachable".to_string())))
    }

    /// Bootstrap, dial and split a fresh connection; stores the write half
    /// and the heartbeat settings, returns the read half.
    async fn establish(&self) -> Result<WsSource, KucoinError> {
        let bullet = self.bootstrap().await?;
        let (stream, server) = self.dial(&bullet).await?;

        self.ping_interval_ms
            .store(server.ping_interval, Ordering::Relaxed);
        self.ping_timeout_ms
            .store(server.ping_timeout, Ordering::Relaxed);

        let (sink, source) = stream.split();
        *self.sink.lock().await = Some(sink);
        Ok(source)
    }

    /// Re-issue subscribe frames for every registered key.
    async fn resubscribe_all(&self) {
        let keys: Vec<SubscriptionKey> =
            lock_ignore_poison(&self.registry).keys().cloned().collect();

        for (channel, symbol) in keys {
            let frame = SubscribeFrame::subscribe(
                next_id(),
                channel.topic(symbol.as_deref()),
                channel.is_private(),
            );
            if let Err(e) = self.send_json(&frame).await {
                warn!(topic = %frame.topic, "failed to resubscribe: {}", e);
            }
        }
    }

    fn resolve_pong(&self, id: &str) {
        if let Some(waiter) = lock_ignore_poison(&self.pending_pongs).remove(id) {
            let _ = waiter.send(());
        }
    }

    /// Route one inbound frame. Callbacks are cloned out of the registry
    /// lock before invocation so registration stays safe to call from other
    /// tasks while dispatch runs.
    fn dispatch(&self, frame: &InboundFrame) {
        match frame.frame_type.as_str() {
            "pong" => {
                if let Some(id) = &frame.id {
                    self.resolve_pong(id);
                }
            }
            "message" => self.dispatch_message(frame),
            "welcome" => debug!(id = ?frame.id, "gateway welcome"),
            "ack" => debug!(id = ?frame.id, "subscription ack"),
            "error" => {
                warn!(code = ?frame.code, data = ?frame.data, "gateway error frame");
            }
            other => debug!(frame_type = %other, "ignoring unknown frame type"),
        }
    }

    fn dispatch_message(&self, frame: &InboundFrame) {
        let Some(topic) = frame.topic.as_deref() else {
            debug!("message frame without topic dropped");
            return;
        };

        let (prefix, symbol) = split_topic(topic);
        let Some(channel) = Channel::from_topic_prefix(prefix) else {
            debug!(topic = %topic, "message for unknown channel dropped");
            return;
        };

        let mut callbacks: Vec<Callback> = Vec::new();
        {
            let registry = lock_ignore_poison(&self.registry);
            if let Some(cb) = registry.get(&(channel, symbol.map(str::to_string))) {
                callbacks.push(Arc::clone(cb));
            }
            // Channel-only subscribers receive every symbol's messages.
            if symbol.is_some() {
                if let Some(cb) = registry.get(&(channel, None)) {
                    callbacks.push(Arc::clone(cb));
                }
            }
        }

        if callbacks.is_empty() {
            debug!(topic = %topic, "no subscriber for message, dropped");
            return;
        }

        for callback in callbacks {
            // A panicking subscriber must not take down the dispatch loop or
            // starve the other subscribers of this event.
            if catch_unwind(AssertUnwindSafe(|| callback(frame))).is_err() {
                warn!(topic = %topic, "subscriber callback panicked, event dropped for it");
            }
        }
    }
}

/// Read-and-dispatch loop; owns reconnection after unexpected drops.
async fn run_reader(inner: Arc<Inner>, mut source: WsSource) {
    loop {
        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Text(text)) => match InboundFrame::parse(&text) {
                    Ok(frame) => inner.dispatch(&frame),
                    Err(e) => warn!("dropping malformed frame: {}", e),
                },
                Ok(Message::Ping(payload)) => {
                    if let Err(e) = inner.send_raw(Message::Pong(payload)).await {
                        warn!("failed to answer transport ping: {}", e);
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("websocket read error: {}", e);
                    break;
                }
            }
        }

        if inner.state() == ConnectionState::Closed {
            return;
        }

        match reconnect(&inner).await {
            Ok(new_source) => source = new_source,
            Err(e) => {
                error!("giving up on reconnection: {}", e);
                inner.set_state(ConnectionState::Disconnected);
                return;
            }
        }
    }
}

/// Redial with exponential backoff, then re-issue every subscribe frame.
async fn reconnect(inner: &Arc<Inner>) -> Result<WsSource, KucoinError> {
    inner.set_state(ConnectionState::Connecting);
    let mut delay = inner.config.reconnect_delay;

    for attempt in 1..=inner.config.max_reconnect_attempts {
        if inner.state() == ConnectionState::Closed {
            return Err(KucoinError::NetworkError("client closed".to_string()));
        }

        match inner.establish().await {
            Ok(source) => {
                inner.set_state(ConnectionState::Connected);
                inner.resubscribe_all().await;
                return Ok(source);
            }
            Err(e) => {
                warn!(attempt, "reconnect attempt failed: {}", e);
                sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(60));
            }
        }
    }

    Err(KucoinError::NetworkError(format!(
        "failed to reconnect after {} attempts",
        inner.config.max_reconnect_attempts
    )))
}

/// Periodic keepalive pings at the interval mandated by the bootstrap
/// response. A missed pong is logged, never fatal.
async fn run_heartbeat(inner: Arc<Inner>) {
    loop {
        let interval =
            Duration::from_millis(inner.ping_interval_ms.load(Ordering::Relaxed).max(1_000));
        sleep(interval).await;

        // Disconnected means the reader gave up on reconnection; nothing is
        // left to keep alive. A later connect() spawns a fresh heartbeat.
        match inner.state() {
            ConnectionState::Closed | ConnectionState::Disconnected => return,
            ConnectionState::Connected => {}
            ConnectionState::Connecting => continue,
        }

        let id = next_id();
        let (tx, rx) = oneshot::channel();
        lock_ignore_poison(&inner.pending_pongs).insert(id.clone(), tx);

        if let Err(e) = inner.send_json(&PingFrame::new(id.clone())).await {
            lock_ignore_poison(&inner.pending_pongs).remove(&id);
            debug!("heartbeat ping not sent: {}", e);
            continue;
        }

        let pong_timeout =
            Duration::from_millis(inner.ping_timeout_ms.load(Ordering::Relaxed).max(1));
        if timeout(pong_timeout, rx).await.is_err() {
            lock_ignore_poison(&inner.pending_pongs).remove(&id);
            warn!("heartbeat pong not received within timeout");
        }
    }
}

impl FuturesWsClient {
    pub(crate) fn new(
        meta: WebsocketMetaApi<ReqwestRest>,
        private: bool,
        config: WsClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                meta,
                private,
                config,
                state: Mutex::new(ConnectionState::Disconnected),
                registry: Mutex::new(HashMap::new()),
                pending_pongs: Mutex::new(HashMap::new()),
                sink: AsyncMutex::new(None),
                tasks: Mutex::new(Vec::new()),
                ping_interval_ms: AtomicU64::new(18_000),
                ping_timeout_ms: AtomicU64::new(10_000),
            }),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state() == ConnectionState::Connected
    }

    /// Bootstrap a token, open the gateway connection and start the
    /// dispatch and heartbeat tasks.
    ///
    /// Fails fast when no instance server is reachable within the configured
    /// connect timeout. Subscriptions registered before `connect()` have
    /// their subscribe frames sent as part of connecting.
    #[instrument(skip(self), fields(private = self.inner.private))]
    pub async fn connect(&self) -> Result<(), KucoinError> {
        {
            let mut state = lock_ignore_poison(&self.inner.state);
            match *state {
                ConnectionState::Connected | ConnectionState::Connecting => {
                    return Err(KucoinError::InvalidParameters(
                        "client is already connected".to_string(),
                    ));
                }
                _ => *state = ConnectionState::Connecting,
            }
        }

        let source = match self.inner.establish().await {
            Ok(source) => source,
            Err(e) => {
                self.inner.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        self.inner.set_state(ConnectionState::Connected);
        self.inner.resubscribe_all().await;

        let reader = tokio::spawn(run_reader(Arc::clone(&self.inner), source));
        let heartbeat = tokio::spawn(run_heartbeat(Arc::clone(&self.inner)));
        lock_ignore_poison(&self.inner.tasks).extend([reader, heartbeat]);

        Ok(())
    }

    /// Send a ping carrying `request_id` and wait for the matching pong.
    ///
    /// Returns the same id on success. Waiting does not block dispatch of
    /// other messages, and a timeout does not close the connection.
    pub async fn ping(&self, request_id: impl Into<String>) -> Result<String, KucoinError> {
        let id = request_id.into();
        let (tx, rx) = oneshot::channel();
        lock_ignore_poison(&self.inner.pending_pongs).insert(id.clone(), tx);

        if let Err(e) = self.inner.send_json(&PingFrame::new(id.clone())).await {
            lock_ignore_poison(&self.inner.pending_pongs).remove(&id);
            return Err(e);
        }

        let pong_timeout =
            Duration::from_millis(self.inner.ping_timeout_ms.load(Ordering::Relaxed).max(1));
        match timeout(pong_timeout, rx).await {
            Ok(Ok(())) => Ok(id),
            Ok(Err(_)) => Err(KucoinError::NetworkError(
                "connection closed while waiting for pong".to_string(),
            )),
            Err(_) => {
                lock_ignore_poison(&self.inner.pending_pongs).remove(&id);
                Err(KucoinError::PingTimeout(id))
            }
        }
    }

    /// Remove the subscription for `(channel, symbol)` and, if it existed,
    /// send an unsubscribe frame.
    pub async fn unsubscribe(
        &self,
        channel: Channel,
        symbol: Option<&str>,
    ) -> Result<(), KucoinError> {
        let key = (channel, symbol.map(str::to_string));
        let removed = lock_ignore_poison(&self.inner.registry)
            .remove(&key)
            .is_some();

        if removed && self.is_connected() {
            let frame = SubscribeFrame::unsubscribe(
                next_id(),
                channel.topic(symbol),
                channel.is_private(),
            );
            self.inner.send_json(&frame).await?;
        }
        Ok(())
    }

    /// Stop the background tasks, close the socket and clear all
    /// subscriptions. Idempotent.
    pub async fn close(&self) -> Result<(), KucoinError> {
        {
            let mut state = lock_ignore_poison(&self.inner.state);
            if *state == ConnectionState::Closed {
                return Ok(());
            }
            *state = ConnectionState::Closed;
        }

        if let Some(mut sink) = self.inner.sink.lock().await.take() {
            let _ = sink.send(Message::Close(None)).await;
        }

        for task in lock_ignore_poison(&self.inner.tasks).drain(..) {
            task.abort();
        }

        lock_ignore_poison(&self.inner.registry).clear();
        // Dropping the waiters fails any in-flight ping with a closed error.
        lock_ignore_poison(&self.inner.pending_pongs).clear();
        Ok(())
    }

    /// Register a callback for `(channel, symbol)`. The last registration
    /// for a key wins; only the first registration sends a subscribe frame.
    async fn register<T, F>(
        &self,
        channel: Channel,
        symbol: Option<&str>,
        callback: F,
    ) -> Result<(), KucoinError>
    where
        T: DeserializeOwned + 'static,
        F: Fn(WsEvent<T>) + Send + Sync + 'static,
    {
        let decoding: Callback = Arc::new(move |frame: &InboundFrame| match frame.typed::<T>() {
            Ok(event) => callback(event),
            Err(e) => warn!(topic = ?frame.topic, "failed to decode event payload: {}", e),
        });

        let key = (channel, symbol.map(str::to_string));
        let first = lock_ignore_poison(&self.inner.registry)
            .insert(key, decoding)
            .is_none();

        if first && self.is_connected() {
            let frame = SubscribeFrame::subscribe(
                next_id(),
                channel.topic(symbol),
                channel.is_private(),
            );
            self.inner.send_json(&frame).await?;
        }
        Ok(())
    }

    /// Subscribe to the trade ticker of a symbol.
    pub async fn on_ticker<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<TickerEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Ticker, Some(symbol), callback).await
    }

    /// Subscribe to the incremental level 2 feed of a symbol.
    pub async fn on_level2<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<Level2ChangeEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Level2, Some(symbol), callback).await
    }

    /// Subscribe to the depth-5 order book snapshots of a symbol.
    pub async fn on_level2_depth5<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<Level2OrderBookEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Level2Depth5, Some(symbol), callback)
            .await
    }

    /// Subscribe to the depth-50 order book snapshots of a symbol.
    pub async fn on_level2_depth50<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<Level2OrderBookEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Level2Depth50, Some(symbol), callback)
            .await
    }

    /// Subscribe to the full order-flow feed of a symbol.
    pub async fn on_level3<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<Level3Event>) + Send + Sync + 'static,
    {
        self.register(Channel::Level3, Some(symbol), callback).await
    }

    /// Subscribe to the revised full order-flow feed of a symbol.
    pub async fn on_level3_v2<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<Level3Event>) + Send + Sync + 'static,
    {
        self.register(Channel::Level3V2, Some(symbol), callback)
            .await
    }

    /// Subscribe to mark/index price ticks and funding rate updates for a
    /// symbol.
    pub async fn on_instrument<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<InstrumentEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Instrument, Some(symbol), callback)
            .await
    }

    /// Subscribe to match executions of a symbol.
    pub async fn on_execution<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<ExecutionChangeEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Execution, Some(symbol), callback)
            .await
    }

    /// Subscribe to account balance changes. Private, symbol-agnostic.
    pub async fn on_account_balance<F>(&self, callback: F) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<AccountChangeEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::AccountBalance, None, callback).await
    }

    /// Subscribe to position changes of a symbol. Private.
    pub async fn on_position<F>(&self, callback: F, symbol: &str) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<PositionChangeEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::Position, Some(symbol), callback)
            .await
    }

    /// Subscribe to the caller's own order lifecycle events. Private; a
    /// `None` symbol receives events for every symbol.
    pub async fn on_trade_orders<F>(
        &self,
        callback: F,
        symbol: Option<&str>,
    ) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<TradeOrderEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::TradeOrders, symbol, callback).await
    }

    /// Subscribe to stop-order lifecycle events. Private, symbol-agnostic.
    pub async fn on_stop_order<F>(&self, callback: F) -> Result<(), KucoinError>
    where
        F: Fn(WsEvent<StopOrderLifecycleEvent>) + Send + Sync + 'static,
    {
        self.register(Channel::StopOrder, None, callback).await
    }
}
