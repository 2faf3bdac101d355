use crosschain_client_sdk::{
    ClientConfig, CrossChainClient, MonitorConfig, SdkError, StatusRequest, StatusUpdate,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crosschain_client_sdk=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let origin_chain = args.next().unwrap_or_else(|| "8453".to_string());
    let origin_tx_hash = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: monitor_transfer <origin-chain> <origin-tx-hash>"))?;

    let client = CrossChainClient::new(&ClientConfig::from_env()?)?
        .with_monitor_config(MonitorConfig::from_env()?);
    let request = StatusRequest::new(origin_chain.as_str(), origin_tx_hash);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel::<StatusUpdate>();
    let printer = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            println!("[attempt {}] status: {:?}", update.attempt, update.status.status);
            for leg in &update.status.transactions {
                println!("  {}: {}", leg.chain_name, leg.tx_hash);
            }
        }
    });

    println!("Monitoring transfer {} ...", request.origin_tx_hash);
    let result = client.wait_for_transfer(&request, Some(tx), cancel).await;
    printer.await?;

    match result {
        Ok(status) if status.status.is_success() => {
            println!("Transfer completed: {:?}", status.status);
        }
        Ok(status) => {
            println!(
                "Transfer ended unsuccessfully: {:?} ({:?})",
                status.status, status.sub_status
            );
        }
        Err(SdkError::MonitoringTimeout { attempts }) => {
            println!("Transfer still pending after {} checks", attempts);
        }
        Err(SdkError::Cancelled) => println!("Monitoring cancelled"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
