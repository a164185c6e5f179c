use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid primary address: {0}")]
    InvalidPrimaryAddress(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Primary {server} answered with response code {rcode}")]
    UnexpectedResponseCode { server: String, rcode: String },

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport I/O error with {server}: {message}")]
    TransportIo { server: String, message: String },

    #[error("Zone transfer from {server} failed: {message}")]
    TransferFailed { server: String, message: String },

    #[error("Persistor {persistor} failed for zone {zone}: {message}")]
    PersistenceFailed {
        persistor: String,
        zone: String,
        message: String,
    },

    #[error("Incomplete zone transfer: {0}")]
    IncompleteTransfer(String),

    #[error("Transfer applies to serial {expected}, stored zone is at {stored:?}")]
    SerialMismatch { expected: u32, stored: Option<u32> },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("No next handler in the chain")]
    NoNextHandler,

    #[error("Failed to write response: {0}")]
    ResponseWriteFailed(String),
}

impl DomainError {
    /// Errors raised by the network layer rather than by the remote server's answer.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::TransportIo { .. }
        )
    }
}
