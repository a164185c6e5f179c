use async_trait::async_trait;
use futures::stream::BoxStream;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, Record};
use std::sync::Arc;
use zonesync_domain::{DomainError, PrimaryAddr, SoaSnapshot};

/// Answer to a SOA query sent to a primary.
#[derive(Debug, Clone)]
pub struct SoaQueryResponse {
    pub response_code: ResponseCode,
    pub answers: Vec<Record>,
}

impl SoaQueryResponse {
    /// Serial of the first SOA record in the answer section.
    pub fn first_soa_serial(&self) -> Option<u32> {
        self.answers.iter().find_map(|record| match record.data() {
            RData::SOA(soa) => Some(soa.serial()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferRequest {
    /// AXFR.
    Full { zone: Arc<str> },
    /// IXFR seeded with the locally known SOA.
    Incremental { zone: Arc<str>, known: SoaSnapshot },
}

impl TransferRequest {
    pub fn for_zone(zone: &str, known: Option<&SoaSnapshot>) -> Self {
        match known {
            Some(soa) => TransferRequest::Incremental {
                zone: zone.into(),
                known: soa.clone(),
            },
            None => TransferRequest::Full { zone: zone.into() },
        }
    }

    pub fn zone(&self) -> &str {
        match self {
            TransferRequest::Full { zone } | TransferRequest::Incremental { zone, .. } => zone,
        }
    }

    pub fn is_incremental(&self) -> bool {
        matches!(self, TransferRequest::Incremental { .. })
    }

    pub fn mode(&self) -> &'static str {
        match self {
            TransferRequest::Full { .. } => "AXFR",
            TransferRequest::Incremental { .. } => "IXFR",
        }
    }
}

/// One unit received from a transfer session.
#[derive(Debug, Clone)]
pub enum TransferEnvelope {
    Records(Vec<Record>),
    Error(DomainError),
}

/// Finite, lazily consumed sequence of transfer envelopes.
pub type TransferStream = BoxStream<'static, TransferEnvelope>;

#[async_trait]
pub trait ZoneTransport: Send + Sync {
    /// Sends a SOA query for `zone` to `primary` over the primary's probe
    /// transport, bounded by the adapter's probe timeout.
    async fn query_soa(
        &self,
        zone: &str,
        primary: &PrimaryAddr,
    ) -> Result<SoaQueryResponse, DomainError>;

    /// Opens a zone-transfer session. An error here means no session was
    /// established at all; failures after that arrive as envelopes.
    async fn open_transfer(
        &self,
        request: &TransferRequest,
        primary: &PrimaryAddr,
    ) -> Result<TransferStream, DomainError>;
}
