/// Named categories of exchange events, each mapping to a wire topic prefix.
///
/// A subscription is keyed by `(Channel, Option<symbol>)`; channels that are
/// symbol-agnostic (the account wallet feed, stop orders) are normally
/// registered without a symbol and matched by the channel-only fallback in
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Ticker,
    Level2,
    Level2Depth5,
    Level2Depth50,
    Level3,
    Level3V2,
    Execution,
    Instrument,
    AccountBalance,
    Position,
    TradeOrders,
    StopOrder,
}

impl Channel {
    /// The topic prefix as it appears on the wire, without any symbol suffix.
    pub fn topic_prefix(self) -> &'static str {
        match self {
            Self::Ticker => "/contractMarket/ticker",
            Self::Level2 => "/contractMarket/level2",
            Self::Level2Depth5 => "/contractMarket/level2Depth5",
            Self::Level2Depth50 => "/contractMarket/level2Depth50",
            Self::Level3 => "/contractMarket/level3",
            Self::Level3V2 => "/contractMarket/level3v2",
            Self::Execution => "/contractMarket/execution",
            Self::Instrument => "/contract/instrument",
            Self::AccountBalance => "/contractAccount/wallet",
            Self::Position => "/contract/position",
            Self::TradeOrders => "/contractMarket/tradeOrders",
            Self::StopOrder => "/contractMarket/advancedOrders",
        }
    }

    /// Whether subscribing to this channel requires an authenticated token.
    pub fn is_private(self) -> bool {
        matches!(
            self,
            Self::AccountBalance | Self::Position | Self::TradeOrders | Self::StopOrder
        )
    }

    /// Resolve a channel from the topic prefix of an inbound message.
    pub fn from_topic_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "/contractMarket/ticker" => Some(Self::Ticker),
            "/contractMarket/level2" => Some(Self::Level2),
            "/contractMarket/level2Depth5" => Some(Self::Level2Depth5),
            "/contractMarket/level2Depth50" => Some(Self::Level2Depth50),
            "/contractMarket/level3" => Some(Self::Level3),
            "/contractMarket/level3v2" => Some(Self::Level3V2),
            "/contractMarket/execution" => Some(Self::Execution),
            "/contract/instrument" => Some(Self::Instrument),
            "/contractAccount/wallet" => Some(Self::AccountBalance),
            "/contract/position" => Some(Self::Position),
            "/contractMarket/tradeOrders" => Some(Self::TradeOrders),
            "/contractMarket/advancedOrders" => Some(Self::StopOrder),
            _ => None,
        }
    }

    /// Build the wire topic for this channel and an optional symbol.
    pub fn topic(self, symbol: Option<&str>) -> String {
        match symbol {
            Some(symbol) => format!("{}:{}", self.topic_prefix(), symbol),
            None => self.topic_prefix().to_string(),
        }
    }
}

/// Split an inbound topic into its prefix and optional symbol part.
pub(crate) fn split_topic(topic: &str) -> (&str, Option<&str>) {
    match topic.split_once(':') {
        Some((prefix, symbol)) => (prefix, Some(symbol)),
        None => (topic, None),
    }
}
