pub mod compose;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod monitor;
pub mod process;
pub mod protocol;
pub mod router;
pub mod usage;

pub use gateway::{GatewayClient, GatewayTimeouts, GatewayTransport};
pub use monitor::RateMonitor;
pub use process::ProcessBridge;
pub use router::RelayRouter;
