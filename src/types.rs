use crate::chain::ChainId;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a cross-chain transfer.
///
/// The set is closed: a status string outside it is rejected when the
/// payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    OriginTxSubmitted,
    OriginTxConfirmed,
    OriginTxReverted,
    BridgePending,
    BridgeDelayed,
    BridgeFilled,
    BridgeFailed,
    RefundPending,
    RefundSucceeded,
    RefundFailed,
    DestinationTxPending,
    DestinationTxConfirmed,
    DestinationTxReverted,
    DestinationTxSucceeded,
    DestinationTxFailed,
    NotFound,
    Unknown,
}

impl StatusKind {
    /// No further transition is expected once a transfer reaches one of these.
    /// Covers both the successful and the permanently failed endings.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::DestinationTxSucceeded
                | Self::DestinationTxFailed
                | Self::DestinationTxReverted
                | Self::BridgeFailed
                | Self::BridgeFilled
                | Self::RefundSucceeded
                | Self::RefundFailed
                | Self::OriginTxReverted
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::DestinationTxSucceeded | Self::BridgeFilled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStatus {
    InsufficientAllowance,
    InsufficientBalance,
    FailedSimulation,
    Expired,
    Internal,
    Unknown,
}

/// One on-chain leg of a transfer (origin, destination or refund).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLeg {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub tx_hash: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatus {
    pub status: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<SubStatus>,
    /// Legs in the order the remote discovered them.
    pub transactions: Vec<TransactionLeg>,
    pub request_id: String,
}

/// Query parameters identifying one transfer on the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub origin_chain: ChainId,
    pub origin_tx_hash: String,
}

impl StatusRequest {
    pub fn new(origin_chain: impl Into<ChainId>, origin_tx_hash: impl Into<String>) -> Self {
        Self {
            origin_chain: origin_chain.into(),
            origin_tx_hash: origin_tx_hash.into(),
        }
    }
}

/// Swap parameters for the quote endpoints, serialized as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub origin_chain: ChainId,
    pub destination_chain: ChainId,
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    pub origin_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmGasCost {
    pub gas_limit: String,
    pub gas_price: String,
    pub total_network_fee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaGasCost {
    pub base_fee: String,
    pub priority_fee: String,
    pub total_network_fee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chainType", rename_all = "lowercase")]
pub enum GasCost {
    Evm(EvmGasCost),
    Solana(SolanaGasCost),
}

impl GasCost {
    pub fn total_network_fee(&self) -> &str {
        match self {
            Self::Evm(cost) => &cost.total_network_fee,
            Self::Solana(cost) => &cost.total_network_fee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransaction {
    pub to: String,
    pub data: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTransaction {
    /// Base64 encoded, unsigned
    pub serialized_transaction: String,
    /// Account covering network fees, when distinct from the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_payer: Option<String>,
}

/// Transaction a caller signs to execute a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chainType", rename_all = "lowercase")]
pub enum RouteTransaction {
    Evm(EvmTransaction),
    Solana(SolanaTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub sell_amount: String,
    pub buy_amount: String,
    pub min_buy_amount: String,
    pub estimated_time_seconds: u64,
    pub gas_costs: GasCost,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowance_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<RouteTransaction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<RouteStep>,
}

/// A route as sent by the remote: either flat, or nested under `route` with
/// the allowance target alongside it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RoutePayload {
    #[serde(rename_all = "camelCase")]
    Nested {
        route: Route,
        #[serde(default)]
        allowance_target: Option<String>,
    },
    Flat(Route),
}

impl RoutePayload {
    pub(crate) fn normalize(self) -> Route {
        match self {
            Self::Nested {
                mut route,
                allowance_target,
            } => {
                if allowance_target.is_some() {
                    route.allowance_target = allowance_target;
                }
                route
            }
            Self::Flat(route) => route,
        }
    }
}

/// One decoded unit of a route stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// `index` is 1-based and counts the routes seen so far on this stream.
    RouteFound {
        route: Route,
        index: usize,
        zid: String,
    },
    Result {
        liquidity_available: bool,
    },
    Fatal {
        message: String,
        code: Option<String>,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::RouteFound { .. } => false,
            Self::Result { .. } | Self::Fatal { .. } => true,
        }
    }
}

// Wire envelopes of the streaming endpoint

#[derive(Debug, Deserialize)]
pub(crate) struct WireFatal {
    pub error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEnvelope {
    pub data: WireEventData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEventData {
    pub zid: String,
    pub event: WireEvent,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub(crate) enum WireEvent {
    Route(RoutePayload),
    Result(WireResult),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireResult {
    pub liquidity_available: bool,
}

/// Body of the non-streaming quotes endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireQuotes {
    pub liquidity_available: bool,
    pub zid: String,
    #[serde(default)]
    pub routes: Vec<RoutePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotes {
    pub liquidity_available: bool,
    pub zid: String,
    pub routes: Vec<Route>,
}

impl From<WireQuotes> for Quotes {
    fn from(wire: WireQuotes) -> Self {
        Self {
            liquidity_available: wire.liquidity_available,
            zid: wire.zid,
            routes: wire.routes.into_iter().map(RoutePayload::normalize).collect(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Code>::deserialize(deserializer)?.map(|code| match code {
        Code::Text(text) => text,
        Code::Number(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evm_route_fields() -> serde_json::Value {
        json!({
            "sellAmount": "1000000",
            "buyAmount": "998000",
            "minBuyAmount": "993010",
            "estimatedTimeSeconds": 12,
            "gasCosts": {
                "chainType": "evm",
                "gasLimit": "210000",
                "gasPrice": "1500000",
                "totalNetworkFee": "315000000000"
            }
        })
    }

    #[test]
    fn test_transfer_status_decoding() {
        let status: TransferStatus = serde_json::from_value(json!({
            "status": "bridge_pending",
            "subStatus": "expired",
            "transactions": [
                {"chainId": 8453, "chainName": "Base", "txHash": "0xaa", "timestamp": 1717000000},
                {"chainId": "solana", "chainName": "Solana", "txHash": "5Kd", "timestamp": 1717000090}
            ],
            "requestId": "req-1"
        }))
        .unwrap();
        assert_eq!(status.status, StatusKind::BridgePending);
        assert_eq!(status.sub_status, Some(SubStatus::Expired));
        assert_eq!(status.transactions[0].chain_id, ChainId::Id(8453));
        assert_eq!(
            status.transactions[1].chain_id,
            ChainId::Name("solana".to_string())
        );
    }

    #[test]
    fn test_status_outside_closed_set_is_rejected() {
        let result = serde_json::from_value::<TransferStatus>(json!({
            "status": "teleported",
            "transactions": [],
            "requestId": "req-1"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_set() {
        let terminal = [
            StatusKind::DestinationTxSucceeded,
            StatusKind::DestinationTxFailed,
            StatusKind::DestinationTxReverted,
            StatusKind::BridgeFailed,
            StatusKind::BridgeFilled,
            StatusKind::RefundSucceeded,
            StatusKind::RefundFailed,
            StatusKind::OriginTxReverted,
        ];
        for status in terminal {
            assert!(status.is_terminal(), "{status:?}");
        }
        for status in [
            StatusKind::OriginTxSubmitted,
            StatusKind::OriginTxConfirmed,
            StatusKind::BridgePending,
            StatusKind::BridgeDelayed,
            StatusKind::RefundPending,
            StatusKind::DestinationTxPending,
            StatusKind::DestinationTxConfirmed,
            StatusKind::NotFound,
            StatusKind::Unknown,
        ] {
            assert!(!status.is_terminal(), "{status:?}");
        }
    }

    #[test]
    fn test_nested_and_flat_routes_normalize_identically() {
        let mut flat = evm_route_fields();
        flat["allowanceTarget"] = json!("0x0000000000001fF3684f28c67538d4D072C22734");
        let nested = json!({
            "route": evm_route_fields(),
            "allowanceTarget": "0x0000000000001fF3684f28c67538d4D072C22734"
        });

        let flat: RoutePayload = serde_json::from_value(flat).unwrap();
        let nested: RoutePayload = serde_json::from_value(nested).unwrap();
        assert!(matches!(nested, RoutePayload::Nested { .. }));
        assert_eq!(flat.normalize(), nested.normalize());
    }

    #[test]
    fn test_solana_route_has_no_allowance_target() {
        let route: RoutePayload = serde_json::from_value(json!({
            "sellAmount": "5000000",
            "buyAmount": "4990000",
            "minBuyAmount": "4965050",
            "estimatedTimeSeconds": 30,
            "gasCosts": {
                "chainType": "solana",
                "baseFee": "5000",
                "priorityFee": "12000",
                "totalNetworkFee": "17000"
            },
            "transaction": {
                "chainType": "solana",
                "serializedTransaction": "AQAB",
                "gasPayer": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
            }
        }))
        .unwrap();
        let route = route.normalize();
        assert_eq!(route.allowance_target, None);
        assert_eq!(route.gas_costs.total_network_fee(), "17000");
        match route.transaction {
            Some(RouteTransaction::Solana(tx)) => assert!(tx.gas_payer.is_some()),
            other => panic!("expected a Solana transaction, got {other:?}"),
        }
    }

    #[test]
    fn test_error_code_accepts_string_or_number() {
        let numeric: WireFatal =
            serde_json::from_value(json!({"error": {"message": "m", "code": 500}})).unwrap();
        assert_eq!(numeric.error.code.as_deref(), Some("500"));
        let text: WireFatal =
            serde_json::from_value(json!({"error": {"message": "m", "code": "RATE_LIMITED"}}))
                .unwrap();
        assert_eq!(text.error.code.as_deref(), Some("RATE_LIMITED"));
        let missing: WireFatal = serde_json::from_value(json!({"error": {"message": "m"}})).unwrap();
        assert_eq!(missing.error.code, None);
    }
}
