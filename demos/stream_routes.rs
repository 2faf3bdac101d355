use crosschain_client_sdk::{
    ChainId, ClientConfig, CrossChainClient, SdkError, StreamEvent, SwapParams,
    types::{GasCost, RouteTransaction},
};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crosschain_client_sdk=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = CrossChainClient::new(&ClientConfig::from_env()?)?;

    // 10 USDC from Base to Arbitrum
    let params = SwapParams {
        origin_chain: ChainId::Id(8453),
        destination_chain: ChainId::Id(42161),
        sell_token: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
        buy_token: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(),
        sell_amount: "10000000".to_string(),
        origin_address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
        destination_address: None,
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let mut events = client.stream_routes(&params, cancel).await?;
    let mut finished = false;

    while let Some(item) = events.next().await {
        match item {
            Ok(StreamEvent::RouteFound { route, index, zid }) => {
                println!("Route #{} (zid {}):", index, zid);
                println!("  Sell amount: {}", route.sell_amount);
                println!("  Buy amount: {}", route.buy_amount);
                println!("  Min buy amount: {}", route.min_buy_amount);
                println!("  Estimated time: {}s", route.estimated_time_seconds);
                match &route.gas_costs {
                    GasCost::Evm(cost) => println!(
                        "  Gas: limit {} at {} (fee {})",
                        cost.gas_limit, cost.gas_price, cost.total_network_fee
                    ),
                    GasCost::Solana(cost) => println!(
                        "  Fees: base {} + priority {} (total {})",
                        cost.base_fee, cost.priority_fee, cost.total_network_fee
                    ),
                }
                if let Some(target) = &route.allowance_target {
                    println!("  Allowance target: {}", target);
                }
                match &route.transaction {
                    Some(RouteTransaction::Evm(tx)) => println!("  Send to: {}", tx.to),
                    Some(RouteTransaction::Solana(tx)) => println!(
                        "  Serialized transaction: {} bytes (base64)",
                        tx.serialized_transaction.len()
                    ),
                    None => {}
                }
            }
            Ok(StreamEvent::Result {
                liquidity_available,
            }) => {
                println!("Liquidity available: {}", liquidity_available);
                finished = true;
            }
            Ok(StreamEvent::Fatal { message, code }) => {
                return Err(SdkError::FatalStream { message, code }.into());
            }
            Err(SdkError::Parse(e)) => eprintln!("Skipping malformed line: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    if !finished {
        println!("Stream ended before a result was received");
    }
    Ok(())
}
