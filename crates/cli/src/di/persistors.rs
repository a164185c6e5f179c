use crate::bootstrap;
use std::sync::Arc;
use tracing::info;
use zonesync_application::ports::Persistor;
use zonesync_domain::config::{PersistenceBackend, PersistenceConfig};
use zonesync_infrastructure::persistence::{MemoryPersistor, SqlitePersistor};

/// Storage backends in the configured lookup order.
pub struct Persistors {
    pub backends: Vec<Arc<dyn Persistor>>,
}

impl Persistors {
    pub async fn new(cfg: &PersistenceConfig) -> anyhow::Result<Self> {
        let mut backends: Vec<Arc<dyn Persistor>> = Vec::with_capacity(cfg.backends.len());

        for backend in &cfg.backends {
            let persistor: Arc<dyn Persistor> = match backend {
                PersistenceBackend::Sqlite => {
                    let pool = bootstrap::init_database(cfg).await?;
                    Arc::new(SqlitePersistor::new(pool))
                }
                PersistenceBackend::Memory => Arc::new(MemoryPersistor::new()),
            };
            info!(backend = backend.as_str(), "Persistence backend enabled");
            backends.push(persistor);
        }

        Ok(Self { backends })
    }
}
