//! Zonesync Domain Layer
pub mod config;
pub mod errors;
pub mod primary;
pub mod serial;
pub mod soa;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use primary::{PrimaryAddr, PrimaryHost, TransportProtocol};
pub use serial::{is_older, MAX_SERIAL_INCREMENT};
pub use soa::{needs_transfer, SoaSnapshot};
