pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use zonesync_domain::{DomainError, TransportProtocol};

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
}

/// One request, one response. Zone transfers use [`tcp::TcpTransport::connect`]
/// directly since they stream many messages over a single connection.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

pub fn create_transport(protocol: TransportProtocol, addr: SocketAddr) -> Transport {
    match protocol {
        TransportProtocol::Udp => Transport::Udp(udp::UdpTransport::new(addr)),
        TransportProtocol::Tcp => Transport::Tcp(tcp::TcpTransport::new(addr)),
    }
}

/// Maps socket errors onto the transport variants of [`DomainError`].
pub(crate) fn io_error(server: SocketAddr, error: io::Error) -> DomainError {
    let server = server.to_string();
    match error.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => DomainError::TransportConnectionReset { server },
        io::ErrorKind::TimedOut => DomainError::TransportTimeout { server },
        _ => DomainError::TransportIo {
            server,
            message: error.to_string(),
        },
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let addr: SocketAddr = "10.0.0.1:53".parse().unwrap();

        let refused = io_error(addr, io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(refused, DomainError::TransportConnectionRefused { .. }));

        let eof = io_error(addr, io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(eof, DomainError::TransportConnectionReset { .. }));

        let other = io_error(addr, io::Error::other("boom"));
        assert!(matches!(other, DomainError::TransportIo { ref message, .. } if message == "boom"));
        assert!(other.is_transport_error());
    }

    #[test]
    fn test_create_transport_by_protocol() {
        let addr: SocketAddr = "10.0.0.1:53".parse().unwrap();
        assert_eq!(create_transport(TransportProtocol::Udp, addr).protocol_name(), "UDP");
        assert_eq!(create_transport(TransportProtocol::Tcp, addr).protocol_name(), "TCP");
    }
}
