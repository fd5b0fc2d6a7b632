pub mod config;
pub mod cost;
pub mod diagnostics;
pub mod error;
pub mod request;
pub mod snapshot;

pub use config::{CliSettings, GatewaySettings, RelayConfig};
pub use cost::{CostRates, TtsTier};
pub use diagnostics::RelayDiagnostics;
pub use error::RelayError;
pub use request::{AttachmentRef, RelayRequest, RelayResult};
pub use snapshot::RateSnapshot;
