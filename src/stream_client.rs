use crate::{
    config::ClientConfig,
    error::{SdkError, SdkResult},
    events::decode_events,
    query_client::http_client,
    types::{Quotes, StreamEvent, SwapParams, WireQuotes},
};
use futures::{StreamExt, stream::BoxStream};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "crosschain_client_sdk::stream";

pub const QUOTES_PATH: &str = "/cross-chain/quotes";
pub const QUOTES_STREAM_PATH: &str = "/cross-chain/quotes/stream";

/// Raw body of an open route stream.
pub type ByteChunks = BoxStream<'static, SdkResult<Vec<u8>>>;

/// Decoded events of an open route stream.
pub type EventStream = BoxStream<'static, SdkResult<StreamEvent>>;

pub struct RouteStreamClient {
    client: reqwest::Client,
    quotes_url: String,
    stream_url: String,
}

impl RouteStreamClient {
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        let client = http_client(&config.api_key)?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub(crate) fn with_client(client: reqwest::Client, api_url: &str) -> Self {
        let base = api_url.trim_end_matches('/');
        Self {
            client,
            quotes_url: format!("{}{}", base, QUOTES_PATH),
            stream_url: format!("{}{}", base, QUOTES_STREAM_PATH),
        }
    }

    /// Open the streaming endpoint and hand back its body as byte chunks.
    ///
    /// The chunks end when the remote closes the connection or when `cancel`
    /// fires; either way the connection is released.
    pub async fn open(
        &self,
        params: &SwapParams,
        cancel: CancellationToken,
    ) -> SdkResult<ByteChunks> {
        tracing::debug!(
            target: TRACING_TARGET,
            origin_chain = %params.origin_chain,
            destination_chain = %params.destination_chain,
            sell_token = %params.sell_token,
            buy_token = %params.buy_token,
            "Opening route stream"
        );

        let request = self
            .client
            .get(&self.stream_url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .query(params)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SdkError::Cancelled),
            response = request => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::Connect {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(SdkError::NoResponseBody);
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(SdkError::from))
            .take_until(cancel.cancelled_owned());
        Ok(chunks.boxed())
    }

    /// Open the streaming endpoint and decode it into events.
    pub async fn stream_routes(
        &self,
        params: &SwapParams,
        cancel: CancellationToken,
    ) -> SdkResult<EventStream> {
        let chunks = self.open(params, cancel.clone()).await?;
        Ok(decode_events(chunks, cancel).boxed())
    }

    /// Non-streaming variant: every route in one response.
    pub async fn get_quotes(&self, params: &SwapParams) -> SdkResult<Quotes> {
        let response = self.client.get(&self.quotes_url).query(params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SdkError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let quotes: WireQuotes = serde_json::from_str(&body)?;
        Ok(quotes.into())
    }
}

/// Keeps at most one route stream alive.
///
/// Starting a stream cancels the one started before it.
#[derive(Default)]
pub struct RouteSession {
    active: Option<CancellationToken>,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Cancel the current stream, if any, and hand out the token for the next.
    pub fn restart(&mut self) -> CancellationToken {
        self.stop();
        let token = CancellationToken::new();
        self.active = Some(token.clone());
        token
    }

    pub fn stop(&mut self) {
        if let Some(previous) = self.active.take() {
            if !previous.is_cancelled() {
                tracing::debug!(target: TRACING_TARGET, "Cancelling previous route stream");
            }
            previous.cancel();
        }
    }

    pub async fn start(
        &mut self,
        client: &RouteStreamClient,
        params: &SwapParams,
    ) -> SdkResult<EventStream> {
        let token = self.restart();
        client.stream_routes(params, token).await
    }
}

impl Drop for RouteSession {
    fn drop(&mut self) {
        self.stop();
    }
}
