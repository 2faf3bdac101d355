use crate::{
    error::{ParseError, SdkError, SdkResult},
    types::{Route, StreamEvent, WireEnvelope, WireEvent, WireFatal},
};
use futures::{Stream, StreamExt, stream};
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "crosschain_client_sdk::events";

const DATA_PREFIX: &str = "data:";

/// Incremental decoder for the route stream.
///
/// Bytes are buffered until a newline arrives, so a chunk boundary may fall
/// anywhere, including inside a multi-byte character. Once a terminal event
/// has been produced every further input is ignored.
#[derive(Debug, Default)]
pub struct EventParser {
    buffer: Vec<u8>,
    routes_seen: usize,
    finished: bool,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a result or fatal event has been produced.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn routes_seen(&self) -> usize {
        self.routes_seen
    }

    /// Feed one chunk and return what the newly completed lines decode to, in
    /// order. Parse errors are returned inline and do not stop decoding.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<StreamEvent, ParseError>> {
        let mut out = Vec::new();
        if self.finished {
            return out;
        }
        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.extend_from_slice(chunk);

        let mut start = 0;
        while let Some(offset) = buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let line = &buffer[start..end];
            start = end + 1;

            let decoded = match std::str::from_utf8(line) {
                Ok(line) => self.decode_line(line.trim_end_matches('\r')),
                Err(_) => Some(Err(ParseError::InvalidUtf8)),
            };
            if let Some(item) = decoded {
                let terminal = matches!(&item, Ok(event) if event.is_terminal());
                out.push(item);
                if terminal {
                    self.finished = true;
                    return out;
                }
            }
        }
        buffer.drain(..start);
        self.buffer = buffer;
        out
    }

    /// Drop whatever is left in the carry-over buffer. An unterminated
    /// trailing fragment is never decoded.
    pub fn finish(&mut self) {
        if !self.buffer.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                bytes = self.buffer.len(),
                "Discarding unterminated trailing fragment"
            );
            self.buffer.clear();
        }
    }

    fn decode_line(&mut self, line: &str) -> Option<Result<StreamEvent, ParseError>> {
        // comments and other SSE fields
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        if payload.is_empty() {
            // heartbeat
            return None;
        }

        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(source) => {
                return Some(Err(ParseError::Json {
                    line: payload.to_string(),
                    source,
                }));
            }
        };

        if value.get("error").is_some() {
            let event = match serde_json::from_value::<WireFatal>(value) {
                Ok(fatal) => StreamEvent::Fatal {
                    message: fatal.error.message,
                    code: fatal.error.code,
                },
                // still fatal, even if the error body is not the usual shape
                Err(_) => StreamEvent::Fatal {
                    message: payload.to_string(),
                    code: None,
                },
            };
            return Some(Ok(event));
        }

        let envelope: WireEnvelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(source) => {
                return Some(Err(ParseError::Schema {
                    line: payload.to_string(),
                    source,
                }));
            }
        };

        let zid = envelope.data.zid;
        let event = match envelope.data.event {
            WireEvent::Route(payload) => {
                self.routes_seen += 1;
                StreamEvent::RouteFound {
                    route: payload.normalize(),
                    index: self.routes_seen,
                    zid,
                }
            }
            WireEvent::Result(result) => StreamEvent::Result {
                liquidity_available: result.liquidity_available,
            },
        };
        Some(Ok(event))
    }
}

struct DecodeState<S> {
    chunks: S,
    parser: EventParser,
    pending: VecDeque<SdkResult<StreamEvent>>,
    cancel: CancellationToken,
    done: bool,
}

/// Turn a stream of byte chunks into a lazy stream of events.
///
/// Items are `Err` for malformed lines (the stream goes on) and for transport
/// failures (the stream ends). The stream ends after the first result or
/// fatal event, when the chunk source is exhausted, or as soon as `cancel`
/// fires; the chunk source is dropped at that point.
pub fn decode_events<S, B, E>(
    chunks: S,
    cancel: CancellationToken,
) -> impl Stream<Item = SdkResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<SdkError>,
{
    let state = DecodeState {
        chunks,
        parser: EventParser::new(),
        pending: VecDeque::new(),
        cancel,
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.cancel.is_cancelled() {
                tracing::debug!(target: TRACING_TARGET, "Route stream cancelled");
                return None;
            }
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }

            let next = tokio::select! {
                biased;
                _ = state.cancel.cancelled() => {
                    tracing::debug!(target: TRACING_TARGET, "Route stream cancelled");
                    return None;
                }
                next = state.chunks.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    for item in state.parser.feed(chunk.as_ref()) {
                        match item {
                            Ok(event) => state.pending.push_back(Ok(event)),
                            Err(err) => {
                                tracing::warn!(
                                    target: TRACING_TARGET,
                                    error = %err,
                                    "Skipping malformed stream line"
                                );
                                state.pending.push_back(Err(err.into()));
                            }
                        }
                    }
                    state.done = state.parser.is_finished();
                }
                Some(Err(err)) => {
                    state.done = true;
                    return Some((Err(err.into()), state));
                }
                None => {
                    state.parser.finish();
                    state.done = true;
                    tracing::debug!(
                        target: TRACING_TARGET,
                        routes = state.parser.routes_seen(),
                        "Route stream closed without a terminal event"
                    );
                }
            }
        }
    })
}

/// How a route stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Completed { liquidity_available: bool },
    /// The connection closed, or was cancelled, before a result arrived.
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDiscovery {
    /// Routes in arrival order; the display index is the position plus one.
    pub routes: Vec<Route>,
    pub outcome: DiscoveryOutcome,
}

/// Drain an event stream, accumulating routes until it ends.
///
/// Malformed lines are skipped. A fatal event or a transport failure is
/// returned as an error.
pub async fn collect_routes<S>(events: S) -> SdkResult<RouteDiscovery>
where
    S: Stream<Item = SdkResult<StreamEvent>>,
{
    let mut events = std::pin::pin!(events);
    let mut routes = Vec::new();

    while let Some(item) = events.next().await {
        match item {
            Ok(StreamEvent::RouteFound { route, .. }) => routes.push(route),
            Ok(StreamEvent::Result {
                liquidity_available,
            }) => {
                return Ok(RouteDiscovery {
                    routes,
                    outcome: DiscoveryOutcome::Completed {
                        liquidity_available,
                    },
                });
            }
            Ok(StreamEvent::Fatal { message, code }) => {
                return Err(SdkError::FatalStream { message, code });
            }
            Err(SdkError::Parse(_)) => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(RouteDiscovery {
        routes,
        outcome: DiscoveryOutcome::Incomplete,
    })
}
