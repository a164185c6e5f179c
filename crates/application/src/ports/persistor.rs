use async_trait::async_trait;
use hickory_proto::rr::Record;
use zonesync_domain::{DomainError, SoaSnapshot};

/// A zone-record storage backend.
///
/// Persistors are independent of each other: the engine writes to each one
/// without ordering or atomicity guarantees across them.
#[async_trait]
pub trait Persistor: Send + Sync {
    fn name(&self) -> &str;

    /// Stores the record set obtained from a zone transfer. The backend derives
    /// the zone's new SOA from these records.
    async fn persist(&self, zone: &str, records: &[Record]) -> Result<(), DomainError>;

    /// The most recently persisted SOA for `zone`, or `None` if the zone is unknown.
    async fn retrieve_soa(&self, zone: &str) -> Result<Option<SoaSnapshot>, DomainError>;
}
