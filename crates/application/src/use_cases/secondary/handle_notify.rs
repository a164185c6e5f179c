use super::persist_records::{PersistRecordsUseCase, PersistReport};
use super::probe_primaries::{PrimarySoa, ProbeOutcome, ProbePrimariesUseCase};
use super::topology::SecondaryTopology;
use super::transfer_zone::TransferZoneUseCase;
use crate::ports::{DnsHandler, ResponseSink, ZoneTransport};
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zonesync_domain::{needs_transfer, DomainError, PrimaryAddr, SoaSnapshot};

/// What a NOTIFY led to. Returned by [`HandleNotifyUseCase::sync_zone`].
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// No primary answered with a SOA.
    NoPrimary { last_error: Option<DomainError> },
    /// A primary answered but the local copy is current.
    UpToDate { primary: PrimaryAddr, serial: u32 },
    /// The transfer produced no records.
    TransferFailed {
        primary: PrimaryAddr,
        error: Option<DomainError>,
    },
    /// Records were transferred and handed to the persistors.
    Synced {
        primary: PrimaryAddr,
        serial: u32,
        incremental: bool,
        record_count: usize,
        transfer_error: Option<DomainError>,
        reports: Vec<PersistReport>,
    },
}

impl SyncOutcome {
    pub fn transferred(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Picks the primary to transfer from, if any.
///
/// A transfer needs a primary that answered with a SOA, no error attached to
/// that answer, and a zone that is missing locally or older than the primary's.
pub fn should_transfer<'a>(
    probe: &'a ProbeOutcome,
    known: Option<&SoaSnapshot>,
) -> Option<&'a PrimarySoa> {
    let answer = probe.answer.as_ref()?;
    if probe.last_error.is_some() {
        return None;
    }
    needs_transfer(known, answer.serial).then_some(answer)
}

/// Entry point of the secondary: acknowledges NOTIFY messages and brings the
/// notified zone up to date; everything else goes down the chain.
pub struct HandleNotifyUseCase {
    topology: Arc<SecondaryTopology>,
    prober: ProbePrimariesUseCase,
    transfer: TransferZoneUseCase,
    fanout: PersistRecordsUseCase,
    next: Option<Arc<dyn DnsHandler>>,
}

impl HandleNotifyUseCase {
    pub fn new(topology: Arc<SecondaryTopology>, transport: Arc<dyn ZoneTransport>) -> Self {
        Self {
            topology,
            prober: ProbePrimariesUseCase::new(Arc::clone(&transport)),
            transfer: TransferZoneUseCase::new(transport),
            fanout: PersistRecordsUseCase::new(),
            next: None,
        }
    }

    pub fn with_next(mut self, next: Arc<dyn DnsHandler>) -> Self {
        self.next = Some(next);
        self
    }

    /// First SOA found walking the persistors in order. Lookup errors count
    /// as "unknown" for that persistor.
    pub async fn known_soa(&self, zone: &str) -> Option<SoaSnapshot> {
        for persistor in self.topology.persistors() {
            match persistor.retrieve_soa(zone).await {
                Ok(Some(soa)) => {
                    debug!(zone = %zone, persistor = persistor.name(), serial = soa.serial, "Known SOA found");
                    return Some(soa);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(zone = %zone, persistor = persistor.name(), error = %e, "Failed to retrieve known SOA");
                }
            }
        }
        None
    }

    /// Probe, transfer if stale, persist. Never fails: every problem is logged
    /// and reflected in the outcome.
    pub async fn sync_zone(&self, zone: &str) -> SyncOutcome {
        let known = self.known_soa(zone).await;

        let probe = self.prober.execute(zone, self.topology.primaries()).await;

        let Some(target) = should_transfer(&probe, known.as_ref()) else {
            return match probe.answer {
                Some(PrimarySoa { primary, serial }) => {
                    debug!(zone = %zone, primary = %primary, serial, "Zone is up to date");
                    SyncOutcome::UpToDate { primary, serial }
                }
                None => {
                    error!(zone = %zone, "The zone couldn't be found among the primaries");
                    SyncOutcome::NoPrimary {
                        last_error: probe.last_error,
                    }
                }
            };
        };

        let outcome = self
            .transfer
            .execute(zone, known.as_ref(), &target.primary)
            .await;

        if outcome.records.is_empty() {
            return SyncOutcome::TransferFailed {
                primary: target.primary.clone(),
                error: outcome.error,
            };
        }

        let reports = self
            .fanout
            .execute(zone, &outcome.records, self.topology.persistors())
            .await;

        info!(
            zone = %zone,
            primary = %target.primary,
            serial = target.serial,
            mode = outcome.request.mode(),
            records = outcome.records.len(),
            failed_persistors = reports.iter().filter(|r| !r.is_ok()).count(),
            "Zone synchronized"
        );

        SyncOutcome::Synced {
            primary: target.primary.clone(),
            serial: target.serial,
            incremental: outcome.request.is_incremental(),
            record_count: outcome.records.len(),
            transfer_error: outcome.error,
            reports,
        }
    }

    async fn acknowledge(&self, request: &Message, sink: &mut dyn ResponseSink) {
        let reply = notify_reply(request);
        if let Err(e) = sink.send(&reply).await {
            warn!(id = request.id(), error = %e, "Failed to acknowledge NOTIFY");
        }
    }

    async fn forward(
        &self,
        request: &Message,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        match &self.next {
            Some(next) => next.handle(request, sink).await,
            None => Err(DomainError::NoNextHandler),
        }
    }
}

/// Authoritative NOERROR reply echoing the NOTIFY's id and question.
pub(crate) fn notify_reply(request: &Message) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, OpCode::Notify);
    reply.add_queries(request.queries().to_vec());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_checking_disabled(request.checking_disabled());
    reply.set_authoritative(true);
    reply.set_response_code(ResponseCode::NoError);
    reply
}

#[async_trait]
impl DnsHandler for HandleNotifyUseCase {
    fn name(&self) -> &'static str {
        "secondary"
    }

    async fn handle(
        &self,
        request: &Message,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        if request.op_code() != OpCode::Notify {
            debug!(op_code = ?request.op_code(), "Not a NOTIFY; passing to the next handler");
            return self.forward(request, sink).await;
        }

        let Some(zone) = request.queries().first().map(|q| q.name().to_utf8()) else {
            warn!(id = request.id(), "NOTIFY without a question");
            self.acknowledge(request, sink).await;
            return Ok(ResponseCode::NoError);
        };

        debug!(zone = %zone, primaries = ?self.topology.primaries(), "Received NOTIFY");

        if self.topology.persistors().is_empty() {
            error!("No transfer persistence was detected");
        }

        self.acknowledge(request, sink).await;

        let outcome = self.sync_zone(&zone).await;
        debug!(zone = %zone, transferred = outcome.transferred(), "NOTIFY handled");

        Ok(ResponseCode::NoError)
    }
}
