use crate::{
    config::{ClientConfig, MonitorConfig},
    error::SdkResult,
    events::{RouteDiscovery, collect_routes},
    monitor::{StatusUpdate, TransactionMonitor},
    query_client::{QueryClient, http_client},
    stream_client::{EventStream, RouteStreamClient},
    types::{Quotes, StatusRequest, SwapParams, TransferStatus},
    utils::validate_address,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Entry point bundling status lookups, transfer monitoring and route
/// discovery against one API deployment.
pub struct CrossChainClient {
    query_client: Arc<QueryClient>,
    stream_client: RouteStreamClient,
    monitor_config: MonitorConfig,
}

impl CrossChainClient {
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        let client = http_client(&config.api_key)?;
        Ok(Self {
            query_client: Arc::new(QueryClient::with_client(client.clone(), &config.api_url)),
            stream_client: RouteStreamClient::with_client(client, &config.api_url),
            monitor_config: MonitorConfig::default(),
        })
    }

    pub fn with_monitor_config(mut self, monitor_config: MonitorConfig) -> Self {
        self.monitor_config = monitor_config;
        self
    }

    pub fn stream_client(&self) -> &RouteStreamClient {
        &self.stream_client
    }

    pub async fn get_transfer_status(&self, request: &StatusRequest) -> SdkResult<TransferStatus> {
        self.query_client.get_transfer_status(request).await
    }

    /// Monitor for a transfer, polling with the client's monitor settings.
    pub fn monitor(&self) -> TransactionMonitor<Arc<QueryClient>> {
        TransactionMonitor::new(self.query_client.clone(), self.monitor_config.clone())
    }

    /// Poll until the transfer is terminal, forwarding each observed status to
    /// `updates` when given.
    pub async fn wait_for_transfer(
        &self,
        request: &StatusRequest,
        updates: Option<mpsc::UnboundedSender<StatusUpdate>>,
        cancel: CancellationToken,
    ) -> SdkResult<TransferStatus> {
        let mut monitor = self.monitor().with_cancellation(cancel);
        if let Some(updates) = updates {
            monitor = monitor.with_updates(updates);
        }
        monitor.wait_for_completion(request).await
    }

    /// Check the addresses in `params` against their chain's format.
    pub fn validate_params(&self, params: &SwapParams) -> SdkResult<()> {
        validate_address(params.origin_chain.family(), &params.origin_address)?;
        if let Some(destination) = &params.destination_address {
            validate_address(params.destination_chain.family(), destination)?;
        }
        Ok(())
    }

    pub async fn stream_routes(
        &self,
        params: &SwapParams,
        cancel: CancellationToken,
    ) -> SdkResult<EventStream> {
        self.validate_params(params)?;
        self.stream_client.stream_routes(params, cancel).await
    }

    /// Stream routes and gather them until the stream ends.
    pub async fn discover_routes(
        &self,
        params: &SwapParams,
        cancel: CancellationToken,
    ) -> SdkResult<RouteDiscovery> {
        let events = self.stream_routes(params, cancel).await?;
        collect_routes(events).await
    }

    pub async fn get_quotes(&self, params: &SwapParams) -> SdkResult<Quotes> {
        self.validate_params(params)?;
        self.stream_client.get_quotes(params).await
    }
}
