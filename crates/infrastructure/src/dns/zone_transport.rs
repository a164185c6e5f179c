use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use super::transport::create_transport;
use super::xfr::XfrSession;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, instrument};
use zonesync_application::ports::{
    SoaQueryResponse, TransferRequest, TransferStream, ZoneTransport,
};
use zonesync_domain::{DomainError, PrimaryAddr};

/// [`ZoneTransport`] speaking DNS on the wire with `hickory-proto` messages.
pub struct HickoryZoneTransport {
    probe_timeout: Duration,
    transfer_timeout: Duration,
}

impl HickoryZoneTransport {
    pub fn new(probe_timeout: Duration, transfer_timeout: Duration) -> Self {
        Self {
            probe_timeout,
            transfer_timeout,
        }
    }

    /// Literal addresses pass through; hostnames go through the system resolver.
    async fn resolve(&self, primary: &PrimaryAddr) -> Result<SocketAddr, DomainError> {
        if let Some(addr) = primary.socket_addr() {
            return Ok(addr);
        }

        let Some((hostname, port)) = primary.host.unresolved_parts() else {
            return Err(DomainError::InvalidPrimaryAddress(primary.to_string()));
        };

        let lookup = tokio::time::timeout(
            self.probe_timeout,
            tokio::net::lookup_host((hostname, port)),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: primary.to_string(),
        })?
        .map_err(|e| DomainError::TransportIo {
            server: primary.to_string(),
            message: format!("failed to resolve {}: {}", hostname, e),
        })?;

        let addr = lookup.into_iter().next().ok_or_else(|| DomainError::TransportIo {
            server: primary.to_string(),
            message: format!("{} resolved to no addresses", hostname),
        })?;

        debug!(primary = %primary, resolved = %addr, "Primary hostname resolved");
        Ok(addr)
    }
}

#[async_trait]
impl ZoneTransport for HickoryZoneTransport {
    #[instrument(skip(self, primary), fields(primary = %primary, protocol = primary.protocol.as_str()))]
    async fn query_soa(
        &self,
        zone: &str,
        primary: &PrimaryAddr,
    ) -> Result<SoaQueryResponse, DomainError> {
        let addr = self.resolve(primary).await?;
        let query = MessageBuilder::build_soa_query(zone)?;

        let transport = create_transport(primary.protocol, addr);
        let response = transport.send(&query.bytes, self.probe_timeout).await?;
        debug!(protocol = transport.protocol_name(), bytes = response.bytes.len(), "SOA response received");

        let message = ResponseParser::parse(&response.bytes, query.id, addr)?;
        Ok(ResponseParser::soa_response(&message))
    }

    #[instrument(skip(self, request, primary), fields(zone = request.zone(), mode = request.mode(), primary = %primary))]
    async fn open_transfer(
        &self,
        request: &TransferRequest,
        primary: &PrimaryAddr,
    ) -> Result<TransferStream, DomainError> {
        let addr = self.resolve(primary).await?;
        let session = XfrSession::open(addr, request, self.transfer_timeout).await?;
        Ok(session.into_stream())
    }
}
