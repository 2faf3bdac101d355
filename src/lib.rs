pub mod bridge_client;
pub mod chain;
pub mod config;
pub mod error;
pub mod events;
pub mod monitor;
pub mod query_client;
pub mod stream_client;
pub mod types;
pub mod utils;

pub use bridge_client::CrossChainClient;
pub use chain::{ChainFamily, ChainId};
pub use config::{ClientConfig, MonitorConfig};
pub use error::{ParseError, SdkError, SdkResult};
pub use events::{DiscoveryOutcome, EventParser, RouteDiscovery, collect_routes, decode_events};
pub use monitor::{StatusSource, StatusUpdate, TransactionMonitor};
pub use stream_client::{RouteSession, RouteStreamClient};
pub use types::{Route, StatusKind, StatusRequest, StreamEvent, SwapParams, TransferStatus};
