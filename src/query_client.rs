use crate::{
    config::ClientConfig,
    error::{SdkError, SdkResult},
    monitor::StatusSource,
    types::{StatusRequest, TransferStatus},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

const TRACING_TARGET: &str = "crosschain_client_sdk::query";

pub const STATUS_PATH: &str = "/cross-chain/status";

pub(crate) const API_KEY_HEADER: &str = "api-key";

pub struct QueryClient {
    client: reqwest::Client,
    status_url: String,
}

impl QueryClient {
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        let client = http_client(&config.api_key)?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub(crate) fn with_client(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            status_url: format!("{}{}", api_url.trim_end_matches('/'), STATUS_PATH),
        }
    }

    /// Look up the current status of one transfer.
    ///
    /// A hash the remote does not know comes back as `not_found` (or as a
    /// remote error); nothing is checked locally.
    pub async fn get_transfer_status(&self, request: &StatusRequest) -> SdkResult<TransferStatus> {
        tracing::debug!(
            target: TRACING_TARGET,
            origin_chain = %request.origin_chain,
            origin_tx_hash = %request.origin_tx_hash,
            "Fetching transfer status"
        );

        let response = self
            .client
            .get(&self.status_url)
            .query(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SdkError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let transfer: TransferStatus = serde_json::from_str(&body)?;
        Ok(transfer)
    }
}

#[async_trait]
impl StatusSource for QueryClient {
    async fn fetch_status(&self, request: &StatusRequest) -> SdkResult<TransferStatus> {
        self.get_transfer_status(request).await
    }
}

/// HTTP client sending the api key on every request.
pub(crate) fn http_client(api_key: &str) -> SdkResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(api_key).map_err(|_| {
        SdkError::Config("api key contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);
    headers.insert(API_KEY_HEADER, value);

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}
