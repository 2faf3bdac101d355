use crosschain_client_sdk::{ClientConfig, StatusRequest, query_client::QueryClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    let query_client = QueryClient::new(&config)?;

    let request = StatusRequest::new(
        8453u64,
        "0x5c4d2b5b2a0e0bfe3a9d1f3a1a0b8e0a0e1c6f2d3f6a9b0c1d2e3f4a5b6c7d8e",
    );
    let status = query_client.get_transfer_status(&request).await?;

    println!("status: {:?}", status.status);
    if let Some(sub_status) = status.sub_status {
        println!("sub status: {:?}", sub_status);
    }
    println!("request id: {}", status.request_id);
    for leg in &status.transactions {
        println!(
            "  {} ({}): {} at {}",
            leg.chain_name, leg.chain_id, leg.tx_hash, leg.timestamp
        );
    }
    Ok(())
}
