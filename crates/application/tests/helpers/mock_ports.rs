use async_trait::async_trait;
use futures::stream;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::Record;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zonesync_application::ports::{
    DnsHandler, Persistor, ResponseSink, SoaQueryResponse, TransferEnvelope, TransferRequest,
    TransferStream, ZoneTransport,
};
use zonesync_domain::{DomainError, PrimaryAddr, SoaSnapshot};

pub fn timeout_error(primary: &str) -> DomainError {
    DomainError::TransportTimeout {
        server: primary.to_string(),
    }
}

enum TransferScript {
    OpenFails(DomainError),
    Envelopes(Vec<TransferEnvelope>),
}

/// Scripted primaries keyed by their `host:port` display form.
#[derive(Default)]
pub struct MockZoneTransport {
    soa_answers: Mutex<HashMap<String, Result<SoaQueryResponse, DomainError>>>,
    transfers: Mutex<HashMap<String, TransferScript>>,
    soa_queries: Mutex<Vec<(String, String)>>,
    transfer_requests: Mutex<Vec<(TransferRequest, String)>>,
}

impl MockZoneTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_soa(&self, primary: &str, answer: Result<SoaQueryResponse, DomainError>) {
        self.soa_answers
            .lock()
            .unwrap()
            .insert(primary.to_string(), answer);
    }

    pub fn set_transfer(&self, primary: &str, envelopes: Vec<TransferEnvelope>) {
        self.transfers
            .lock()
            .unwrap()
            .insert(primary.to_string(), TransferScript::Envelopes(envelopes));
    }

    pub fn set_transfer_records(&self, primary: &str, records: Vec<Record>) {
        self.set_transfer(primary, vec![TransferEnvelope::Records(records)]);
    }

    pub fn set_transfer_open_error(&self, primary: &str, error: DomainError) {
        self.transfers
            .lock()
            .unwrap()
            .insert(primary.to_string(), TransferScript::OpenFails(error));
    }

    /// (zone, primary) pairs in query order.
    pub fn soa_queries(&self) -> Vec<(String, String)> {
        self.soa_queries.lock().unwrap().clone()
    }

    pub fn transfer_requests(&self) -> Vec<(TransferRequest, String)> {
        self.transfer_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZoneTransport for MockZoneTransport {
    async fn query_soa(
        &self,
        zone: &str,
        primary: &PrimaryAddr,
    ) -> Result<SoaQueryResponse, DomainError> {
        let key = primary.to_string();
        self.soa_queries
            .lock()
            .unwrap()
            .push((zone.to_string(), key.clone()));

        self.soa_answers
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::TransportConnectionRefused { server: key })
            })
    }

    async fn open_transfer(
        &self,
        request: &TransferRequest,
        primary: &PrimaryAddr,
    ) -> Result<TransferStream, DomainError> {
        let key = primary.to_string();
        self.transfer_requests
            .lock()
            .unwrap()
            .push((request.clone(), key.clone()));

        match self.transfers.lock().unwrap().get(&key) {
            Some(TransferScript::OpenFails(e)) => Err(e.clone()),
            Some(TransferScript::Envelopes(envelopes)) => {
                Ok(Box::pin(stream::iter(envelopes.clone())))
            }
            None => Err(DomainError::TransportConnectionRefused { server: key }),
        }
    }
}

pub struct MockPersistor {
    name: String,
    known: Mutex<HashMap<String, SoaSnapshot>>,
    fail_persist: bool,
    fail_lookup: bool,
    persisted: Mutex<Vec<(String, Vec<Record>)>>,
    lookups: AtomicUsize,
}

impl MockPersistor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            known: Mutex::new(HashMap::new()),
            fail_persist: false,
            fail_lookup: false,
            persisted: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail_persist: true,
            ..Self::new(name)
        }
    }

    pub fn failing_lookup(name: &str) -> Self {
        Self {
            fail_lookup: true,
            ..Self::new(name)
        }
    }

    pub fn with_known(self, zone: &str, soa: SoaSnapshot) -> Self {
        self.known.lock().unwrap().insert(zone.to_string(), soa);
        self
    }

    pub fn persisted(&self) -> Vec<(String, Vec<Record>)> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn persist_calls(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Persistor for MockPersistor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn persist(&self, zone: &str, records: &[Record]) -> Result<(), DomainError> {
        self.persisted
            .lock()
            .unwrap()
            .push((zone.to_string(), records.to_vec()));

        if self.fail_persist {
            return Err(DomainError::PersistenceFailed {
                persistor: self.name.clone(),
                zone: zone.to_string(),
                message: "disk full".to_string(),
            });
        }
        Ok(())
    }

    async fn retrieve_soa(&self, zone: &str) -> Result<Option<SoaSnapshot>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(DomainError::DatabaseError("database is locked".to_string()));
        }
        Ok(self.known.lock().unwrap().get(zone).cloned())
    }
}

pub struct MockNextHandler {
    rcode: ResponseCode,
    calls: AtomicUsize,
}

impl MockNextHandler {
    pub fn new(rcode: ResponseCode) -> Self {
        Self {
            rcode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsHandler for MockNextHandler {
    fn name(&self) -> &'static str {
        "mock-next"
    }

    async fn handle(
        &self,
        _request: &Message,
        _sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rcode)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<Message>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn send(&mut self, response: &Message) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::ResponseWriteFailed(
                "connection reset".to_string(),
            ));
        }
        self.sent.push(response.clone());
        Ok(())
    }
}

pub fn as_persistors(mocks: &[Arc<MockPersistor>]) -> Vec<Arc<dyn Persistor>> {
    mocks
        .iter()
        .map(|m| Arc::clone(m) as Arc<dyn Persistor>)
        .collect()
}
