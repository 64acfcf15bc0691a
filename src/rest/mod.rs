//! REST adapter layer: one adapter per API group, each a thin forwarding
//! wrapper over the kernel [`RestClient`](crate::core::kernel::RestClient).

pub mod funding;
pub mod index;
pub mod models;
pub mod order;
pub mod websocket_meta;

pub use funding::FundingApi;
pub use index::IndexApi;
pub use models::{
    BulletResponse, DuringRequest, FundingHistoryItem, FundingRate, HasMoreResponse, Index,
    IndexItem, InstanceServer, MarkPrice, OrderCancelResponse, OrderCreateRequest,
    OrderCreateResponse, OrderListRequest, OrderResponse, Pagination, RestResponse,
};
pub use order::OrderApi;
pub use websocket_meta::WebsocketMetaApi;

use crate::core::kernel::ReqwestRest;

/// The full REST surface, grouped by API area. All groups share one
/// underlying HTTP client and credential set.
#[derive(Debug, Clone)]
pub struct FuturesRestClient {
    pub order: OrderApi<ReqwestRest>,
    pub funding: FundingApi<ReqwestRest>,
    pub index: IndexApi<ReqwestRest>,
    pub websocket: WebsocketMetaApi<ReqwestRest>,
}

impl FuturesRestClient {
    pub(crate) fn new(rest: ReqwestRest) -> Self {
        Self {
            order: OrderApi::new(rest.clone()),
            funding: FundingApi::new(rest.clone()),
            index: IndexApi::new(rest.clone()),
            websocket: WebsocketMetaApi::new(rest),
        }
    }
}
