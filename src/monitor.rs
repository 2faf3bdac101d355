use crate::{
    config::MonitorConfig,
    error::{SdkError, SdkResult},
    types::{StatusRequest, TransferStatus},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "crosschain_client_sdk::monitor";

/// Single-shot lookup of a transfer's status
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, request: &StatusRequest) -> SdkResult<TransferStatus>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn fetch_status(&self, request: &StatusRequest) -> SdkResult<TransferStatus> {
        (**self).fetch_status(request).await
    }
}

/// Published after every attempt that returned a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub attempt: u32,
    pub status: TransferStatus,
}

/// Polls a [`StatusSource`] until the transfer reaches a terminal state.
pub struct TransactionMonitor<S> {
    source: S,
    config: MonitorConfig,
    updates: Option<mpsc::UnboundedSender<StatusUpdate>>,
    cancel: CancellationToken,
}

impl<S: StatusSource> TransactionMonitor<S> {
    pub fn new(source: S, config: MonitorConfig) -> Self {
        Self {
            source,
            config,
            updates: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Receive every status the monitor observes. Sending never blocks, and a
    /// dropped receiver does not affect monitoring.
    pub fn with_updates(mut self, updates: mpsc::UnboundedSender<StatusUpdate>) -> Self {
        self.updates = Some(updates);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Poll until the transfer is terminal and return that status.
    ///
    /// Terminal covers failures too (`bridge_failed`, `refund_failed`, ...):
    /// inspect the returned status to tell them apart. Fetch errors are
    /// retried; the one from the last attempt is returned. If every attempt
    /// sees a pending transfer the result is [`SdkError::MonitoringTimeout`].
    pub async fn wait_for_completion(&self, request: &StatusRequest) -> SdkResult<TransferStatus> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(SdkError::Cancelled),
                fetched = self.source.fetch_status(request) => fetched,
            };

            match fetched {
                Ok(status) => {
                    let kind = status.status;
                    self.publish(attempt, &status);
                    if kind.is_terminal() {
                        tracing::info!(
                            target: TRACING_TARGET,
                            origin_tx_hash = %request.origin_tx_hash,
                            attempt,
                            status = ?kind,
                            "Transfer reached terminal status"
                        );
                        return Ok(status);
                    }
                    tracing::debug!(
                        target: TRACING_TARGET,
                        origin_tx_hash = %request.origin_tx_hash,
                        attempt,
                        max_attempts,
                        status = ?kind,
                        "Transfer still in progress"
                    );
                }
                Err(err) if attempt == max_attempts => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        origin_tx_hash = %request.origin_tx_hash,
                        attempt,
                        error = %err,
                        "Status check failed on final attempt"
                    );
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        origin_tx_hash = %request.origin_tx_hash,
                        attempt,
                        max_attempts,
                        retryable = err.is_retryable(),
                        error = %err,
                        "Status check failed, will retry"
                    );
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Err(SdkError::Cancelled),
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }
        }

        tracing::warn!(
            target: TRACING_TARGET,
            origin_tx_hash = %request.origin_tx_hash,
            attempts = max_attempts,
            "Gave up waiting for transfer"
        );
        Err(SdkError::MonitoringTimeout {
            attempts: max_attempts,
        })
    }

    fn publish(&self, attempt: u32, status: &TransferStatus) {
        if let Some(updates) = &self.updates {
            // receiver gone: nobody is listening any more
            let _ = updates.send(StatusUpdate {
                attempt,
                status: status.clone(),
            });
        }
    }
}
