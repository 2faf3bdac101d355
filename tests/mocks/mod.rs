//! In-process stand-in for the swap API used by the integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::{StreamExt, stream};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-api-key";

pub const EVM_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const USDC_ARBITRUM: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

/// Status sequence served for the `0xprogressing` transfer.
pub const PROGRESSION: [&str; 3] = ["bridge_pending", "bridge_pending", "destination_tx_succeeded"];

#[derive(Default)]
pub struct MockState {
    pub status_calls: AtomicU32,
    pub stream_calls: AtomicU32,
}

pub struct TestServer {
    pub base_url: String,
    pub state: Arc<MockState>,
    pub handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/cross-chain/status", get(status_handler))
            .route("/cross-chain/quotes", get(quotes_handler))
            .route("/cross-chain/quotes/stream", get(stream_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}:{}", addr.ip(), addr.port());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    pub fn status_calls(&self) -> u32 {
        self.state.status_calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("api-key")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == API_KEY)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "missing or invalid api key").into_response()
}

fn status_body(status: &str) -> Value {
    json!({
        "status": status,
        "transactions": [
            {"chainId": 8453, "chainName": "Base", "txHash": "0xprogressing", "timestamp": 1717000000u64}
        ],
        "requestId": "req-42"
    })
}

async fn status_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let call = state.status_calls.fetch_add(1, Ordering::SeqCst) as usize;
    if !authorized(&headers) {
        return unauthorized();
    }
    if query.get("originChain").map(String::as_str) != Some("8453") {
        return (StatusCode::BAD_REQUEST, "unsupported originChain").into_response();
    }

    match query.get("originTxHash").map(String::as_str) {
        Some("0xprogressing") => {
            let status = PROGRESSION[call.min(PROGRESSION.len() - 1)];
            Json(status_body(status)).into_response()
        }
        Some("0xpending") => Json(status_body("bridge_pending")).into_response(),
        Some("0xgarbled") => Json(json!({"status": "warp_speed", "requestId": 7})).into_response(),
        Some("0xflaky") if call == 0 => {
            (StatusCode::SERVICE_UNAVAILABLE, "try again").into_response()
        }
        Some("0xflaky") => Json(status_body("refund_succeeded")).into_response(),
        _ => Json(json!({
            "status": "not_found",
            "transactions": [],
            "requestId": "req-0"
        }))
        .into_response(),
    }
}

pub fn flat_route(buy_amount: &str) -> Value {
    json!({
        "sellAmount": "10000000",
        "buyAmount": buy_amount,
        "minBuyAmount": "9950000",
        "estimatedTimeSeconds": 15,
        "gasCosts": {
            "chainType": "evm",
            "gasLimit": "250000",
            "gasPrice": "1200000",
            "totalNetworkFee": "300000000000"
        },
        "allowanceTarget": "0x0000000000001fF3684f28c67538d4D072C22734",
        "transaction": {
            "chainType": "evm",
            "to": "0x0000000000001fF3684f28c67538d4D072C22734",
            "data": "0xdeadbeef",
            "value": "0"
        }
    })
}

pub fn nested_route(buy_amount: &str) -> Value {
    let mut route = flat_route(buy_amount);
    let allowance_target = route
        .as_object_mut()
        .and_then(|fields| fields.remove("allowanceTarget"))
        .unwrap_or(Value::Null);
    json!({"route": route, "allowanceTarget": allowance_target})
}

fn data_line(payload: &Value) -> String {
    format!("data: {}\n\n", payload)
}

fn route_event(route: Value) -> String {
    data_line(&json!({"data": {"zid": "z1", "event": {"type": "route", "data": route}}}))
}

fn result_event(liquidity_available: bool) -> String {
    data_line(&json!({
        "data": {"zid": "z1", "event": {"type": "result", "data": {"liquidityAvailable": liquidity_available}}}
    }))
}

fn fatal_event() -> String {
    data_line(&json!({"error": {"message": "Quote engine unavailable", "code": 503, "type": "fatal"}}))
}

/// Byte chunks of a stream, split at awkward places so that lines straddle
/// chunk boundaries.
fn split_awkwardly(body: String) -> Vec<Vec<u8>> {
    body.into_bytes().chunks(37).map(<[u8]>::to_vec).collect()
}

fn event_stream(chunks: Vec<Vec<u8>>, hang: bool) -> Response {
    let body = stream::iter(chunks.into_iter().map(Ok::<_, Infallible>));
    let body = if hang {
        Body::from_stream(body.chain(stream::pending()))
    } else {
        Body::from_stream(body)
    };
    Response::builder()
        .header("content-type", "text/event-stream")
        .body(body)
        .unwrap()
}

async fn stream_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.stream_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let expected = ["originChain", "destinationChain", "sellToken", "buyToken", "originAddress"];
    if expected.iter().any(|key| !query.contains_key(*key)) {
        return (StatusCode::BAD_REQUEST, "missing swap parameter").into_response();
    }

    let scenario = query.get("sellAmount").map(String::as_str).unwrap_or_default();
    let body = match scenario {
        "0" => return (StatusCode::UNPROCESSABLE_ENTITY, "sellAmount must be positive").into_response(),
        "204" => return StatusCode::NO_CONTENT.into_response(),
        "fatal" => [route_event(flat_route("9990000")), fatal_event(), result_event(true)].concat(),
        "truncated" => [": hello\n\n".to_string(), route_event(flat_route("9990000"))].concat(),
        "hang" => {
            return event_stream(vec![route_event(flat_route("9990000")).into_bytes()], true);
        }
        _ => [
            ": connected\n\n".to_string(),
            "data: \n\n".to_string(),
            route_event(flat_route("9990000")),
            "data: {oops\n\n".to_string(),
            route_event(nested_route("9985000")),
            result_event(true),
        ]
        .concat(),
    };
    event_stream(split_awkwardly(body), false)
}

async fn quotes_handler(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "liquidityAvailable": true,
        "zid": "z2",
        "routes": [flat_route("9990000"), nested_route("9990000")]
    }))
    .into_response()
}
