use crate::ports::Persistor;
use futures::future::join_all;
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::{debug, error};
use zonesync_domain::DomainError;

#[derive(Debug, Clone)]
pub struct PersistReport {
    pub persistor: String,
    pub result: Result<(), DomainError>,
}

impl PersistReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Hands a record set to every persistor. One backend failing never stops
/// delivery to the others, and nothing is rolled back.
#[derive(Debug, Default, Clone, Copy)]
pub struct PersistRecordsUseCase;

impl PersistRecordsUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        zone: &str,
        records: &[Record],
        persistors: &[Arc<dyn Persistor>],
    ) -> Vec<PersistReport> {
        let writes = persistors.iter().map(|persistor| async move {
            let result = persistor.persist(zone, records).await;
            match &result {
                Ok(()) => {
                    debug!(zone = %zone, persistor = persistor.name(), records = records.len(), "Zone records persisted");
                }
                Err(e) => {
                    error!(
                        zone = %zone,
                        persistor = persistor.name(),
                        error = %e,
                        "There was an error persisting zone records"
                    );
                }
            }
            PersistReport {
                persistor: persistor.name().to_string(),
                result,
            }
        });

        join_all(writes).await
    }
}
