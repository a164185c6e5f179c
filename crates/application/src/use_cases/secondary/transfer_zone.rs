use crate::ports::{TransferEnvelope, TransferRequest, ZoneTransport};
use futures::StreamExt;
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::{debug, error, warn};
use zonesync_domain::{DomainError, PrimaryAddr, SoaSnapshot};

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub request: TransferRequest,
    /// Records in arrival order. Possibly partial when `error` is set.
    pub records: Vec<Record>,
    pub error: Option<DomainError>,
}

/// Pulls a zone from a primary: IXFR when a SOA is already known, AXFR otherwise.
pub struct TransferZoneUseCase {
    transport: Arc<dyn ZoneTransport>,
}

impl TransferZoneUseCase {
    pub fn new(transport: Arc<dyn ZoneTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        zone: &str,
        known: Option<&SoaSnapshot>,
        primary: &PrimaryAddr,
    ) -> TransferOutcome {
        let request = TransferRequest::for_zone(zone, known);
        debug!(zone = %zone, primary = %primary, mode = request.mode(), "Requesting zone transfer");

        let mut stream = match self.transport.open_transfer(&request, primary).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(primary = %primary, zone = %zone, error = %e, "Failed to open zone transfer");
                return TransferOutcome {
                    request,
                    records: Vec::new(),
                    error: Some(e),
                };
            }
        };

        let mut records = Vec::new();
        let mut last_error = None;

        while let Some(envelope) = stream.next().await {
            match envelope {
                TransferEnvelope::Records(batch) => records.extend(batch),
                TransferEnvelope::Error(e) => {
                    warn!(primary = %primary, zone = %zone, error = %e, "Skipping failed transfer envelope");
                    last_error = Some(e);
                }
            }
        }

        debug!(
            zone = %zone,
            primary = %primary,
            records = records.len(),
            failed = last_error.is_some(),
            "Zone transfer finished"
        );

        TransferOutcome {
            request,
            records,
            error: last_error,
        }
    }
}
