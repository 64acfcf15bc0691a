//! REST adapter tests backed by a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kucoin_futures::rest::{DuringRequest, OrderCreateRequest, OrderListRequest};
use kucoin_futures::{FuturesClientBuilder, FuturesRestClient, KucoinError};

fn authenticated_client(base_url: &str) -> FuturesRestClient {
    FuturesClientBuilder::new()
        .with_base_url(base_url.to_string())
        .with_credentials(
            "test_key".to_string(),
            "test_secret".to_string(),
            "test_passphrase".to_string(),
        )
        .build_rest_client()
        .unwrap()
}

fn public_client(base_url: &str) -> FuturesRestClient {
    FuturesClientBuilder::new()
        .with_base_url(base_url.to_string())
        .build_rest_client()
        .unwrap()
}

fn limit_order() -> OrderCreateRequest {
    OrderCreateRequest {
        client_oid: "test-oid-1".to_string(),
        symbol: "XBTUSDM".to_string(),
        side: "buy".to_string(),
        order_type: "limit".to_string(),
        leverage: "5".to_string(),
        price: Some("8600".parse().unwrap()),
        size: Some("1".parse().unwrap()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_order_sends_signed_headers_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .and(header_exists("KC-API-KEY"))
        .and(header_exists("KC-API-SIGN"))
        .and(header_exists("KC-API-TIMESTAMP"))
        .and(header_exists("KC-API-PASSPHRASE"))
        .and(header("KC-API-KEY-VERSION", "2"))
        .and(body_partial_json(json!({
            "clientOid": "test-oid-1",
            "symbol": "XBTUSDM",
            "type": "limit"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {"orderId": "5bd6e9286d99522a52e458de"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let response = client.order.create_order(limit_order()).await.unwrap();
    assert_eq!(response.order_id, "5bd6e9286d99522a52e458de");
}

#[tokio::test]
async fn create_order_rejects_empty_client_oid_without_a_request() {
    let server = MockServer::start().await;

    let client = authenticated_client(&server.uri());
    let mut request = limit_order();
    request.client_oid = String::new();

    let err = client.order.create_order(request).await.unwrap_err();
    assert!(matches!(err, KucoinError::InvalidParameters(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn exchange_error_code_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "300000",
            "msg": "Balance insufficient"
        })))
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let err = client.order.create_order(limit_order()).await.unwrap_err();
    match err {
        KucoinError::ApiError { code, message } => {
            assert_eq!(code, "300000");
            assert_eq!(message, "Balance insufficient");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_success_http_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let err = client.order.get_order("unknown").await.unwrap_err();
    assert!(matches!(err, KucoinError::ApiError { code, .. } if code == "404"));
}

#[tokio::test]
async fn authenticated_endpoint_without_credentials_is_an_auth_error() {
    let server = MockServer::start().await;

    let client = public_client(&server.uri());
    let err = client.order.get_order("5bd6e928").await.unwrap_err();
    assert!(matches!(err, KucoinError::AuthError(_)));
}

#[tokio::test]
async fn cancel_all_limit_orders_passes_the_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/orders"))
        .and(query_param("symbol", "XBTUSDM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {"cancelledOrderIds": ["5c52e11203aa677f33e493fb", "5c52e12103aa677f33e493fe"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let response = client
        .order
        .cancel_all_limit_orders("XBTUSDM")
        .await
        .unwrap();
    assert_eq!(response.cancelled_order_ids.len(), 2);
}

#[tokio::test]
async fn list_orders_with_no_filter_sends_no_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "currentPage": 1,
                "pageSize": 50,
                "totalNum": 0,
                "totalPage": 0,
                "items": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let page = client.order.list_orders(None).await.unwrap();
    assert_eq!(page.current_page, 1);
    assert!(page.items.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn list_orders_filter_becomes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .and(query_param("symbol", "XBTUSDM"))
        .and(query_param("status", "active"))
        .and(query_param("startAt", "1700000000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "currentPage": 1,
                "pageSize": 50,
                "totalNum": 1,
                "totalPage": 1,
                "items": [{
                    "id": "5cdfc138b21023a909e5ad55",
                    "symbol": "XBTUSDM",
                    "type": "limit",
                    "side": "buy",
                    "price": "3600",
                    "size": 20000,
                    "dealSize": 0,
                    "dealValue": "0",
                    "leverage": "5",
                    "stop": "",
                    "stopPrice": null,
                    "stopPriceType": "",
                    "clientOid": "oid-1",
                    "status": "open",
                    "isActive": true,
                    "createdAt": 1558167872000_i64,
                    "updatedAt": 1558167872000_i64
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let request = OrderListRequest {
        symbol: Some("XBTUSDM".to_string()),
        status: Some("active".to_string()),
        during: DuringRequest {
            start_at: Some(1_700_000_000_000),
            ..Default::default()
        },
        ..Default::default()
    };

    let page = client.order.list_orders(Some(request)).await.unwrap();
    assert_eq!(page.items[0].id, "5cdfc138b21023a909e5ad55");
    assert_eq!(page.items[0].client_oid.as_deref(), Some("oid-1"));
}

#[tokio::test]
async fn funding_history_substitutes_a_default_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/funding-history"))
        .and(query_param("symbol", "XBTUSDM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "hasMore": true,
                "dataList": [{
                    "id": 36275152660006_i64,
                    "symbol": "XBTUSDM",
                    "timePoint": 1558000800000_i64,
                    "fundingRate": 0.000013,
                    "markPrice": 8058.27,
                    "positionQty": 10,
                    "positionCost": -0.001241,
                    "funding": -0.00000464,
                    "settleCurrency": "XBT"
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server.uri());
    let history = client
        .funding
        .funding_history("XBTUSDM", None, None, None)
        .await
        .unwrap();
    assert!(history.has_more);
    assert_eq!(history.data_list[0].settle_currency, "XBT");

    // Absent window fields never reach the wire.
    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(!query.contains("startAt"));
    assert!(!query.contains("maxCount"));
}

#[tokio::test]
async fn current_mark_price_is_a_public_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/mark-price/XBTUSDM/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "symbol": "XBTUSDM",
                "granularity": 1000,
                "timePoint": 1558000800000_i64,
                "value": 8058.27,
                "indexPrice": 8057.92
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // No credentials configured; public endpoints must not require them.
    let client = public_client(&server.uri());
    let mark = client.index.current_mark_price("XBTUSDM").await.unwrap();
    assert_eq!(mark.symbol, "XBTUSDM");

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("KC-API-SIGN"));
}

#[tokio::test]
async fn index_list_decodes_the_decomposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/index/query"))
        .and(query_param("symbol", ".KXBT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "hasMore": false,
                "dataList": [{
                    "symbol": ".KXBT",
                    "granularity": 1000,
                    "timePoint": 1557996300000_i64,
                    "value": 8003.21,
                    "decompositionList": [
                        {"exchange": "gemini", "price": 8003.35, "weight": 0.04},
                        {"exchange": "kraken", "price": 8003.32, "weight": 0.044}
                    ]
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_client(&server.uri());
    let index = client.index.index_list(".KXBT", None, None, None).await.unwrap();
    assert_eq!(index.data_list[0].decomposition_list.len(), 2);
    assert_eq!(index.data_list[0].decomposition_list[0].exchange, "gemini");
}

#[tokio::test]
async fn current_funding_rate_decodes_predicted_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/funding-rate/XBTUSDM/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "symbol": ".XBTUSDMFPI8H",
                "granularity": 28800000,
                "timePoint": 1558000800000_i64,
                "value": 0.00375,
                "predictedValue": 0.00375
            }
        })))
        .mount(&server)
        .await;

    let client = public_client(&server.uri());
    let rate = client
        .funding
        .current_funding_rate("XBTUSDM")
        .await
        .unwrap();
    assert_eq!(rate.granularity, 28_800_000);
    assert!(rate.predicted_value.is_some());
}

#[tokio::test]
async fn bullet_public_needs_no_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bullet-public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "token": "vYNlCtbz89",
                "instanceServers": [{
                    "endpoint": "wss://ws-api-futures.kucoin.com/",
                    "encrypt": true,
                    "protocol": "websocket",
                    "pingInterval": 18000,
                    "pingTimeout": 10000
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_client(&server.uri());
    let bullet = client.websocket.bullet_public().await.unwrap();
    assert_eq!(bullet.token, "vYNlCtbz89");
    assert_eq!(bullet.instance_servers[0].ping_interval, 18_000);
}
