use super::{apply_transfer, zone_key, zone_soa};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hickory_proto::rr::Record;
use tracing::debug;
use zonesync_application::ports::Persistor;
use zonesync_domain::{DomainError, SoaSnapshot};

/// Zones kept in process memory. Contents are lost on restart, which makes
/// every restart start with full transfers.
#[derive(Default)]
pub struct MemoryPersistor {
    zones: DashMap<String, Vec<Record>>,
}

impl MemoryPersistor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self, zone: &str) -> Vec<Record> {
        self.zones
            .get(&zone_key(zone))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }
}

#[async_trait]
impl Persistor for MemoryPersistor {
    fn name(&self) -> &str {
        "memory"
    }

    async fn persist(&self, zone: &str, records: &[Record]) -> Result<(), DomainError> {
        let failed = |e: DomainError| DomainError::PersistenceFailed {
            persistor: self.name().to_string(),
            zone: zone.to_string(),
            message: e.to_string(),
        };

        // The entry guard serializes concurrent updates of the same zone.
        let stored_len = match self.zones.entry(zone_key(zone)) {
            Entry::Occupied(mut entry) => {
                let updated = apply_transfer(entry.get(), records).map_err(failed)?;
                let len = updated.len();
                entry.insert(updated);
                len
            }
            Entry::Vacant(entry) => {
                let updated = apply_transfer(&[], records).map_err(failed)?;
                let len = updated.len();
                entry.insert(updated);
                len
            }
        };

        debug!(zone = %zone, records = stored_len, "Zone stored in memory");
        Ok(())
    }

    async fn retrieve_soa(&self, zone: &str) -> Result<Option<SoaSnapshot>, DomainError> {
        Ok(self
            .zones
            .get(&zone_key(zone))
            .and_then(|entry| zone_soa(entry.value())))
    }
}
