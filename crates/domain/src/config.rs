pub mod errors;
pub mod logging;
pub mod persistence;
pub mod root;
pub mod secondary;
pub mod server;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use persistence::{PersistenceBackend, PersistenceConfig};
pub use root::{CliOverrides, Config};
pub use secondary::SecondaryConfig;
pub use server::ServerConfig;
