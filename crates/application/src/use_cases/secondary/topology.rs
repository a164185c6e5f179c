use crate::ports::Persistor;
use std::fmt;
use std::sync::Arc;
use zonesync_domain::PrimaryAddr;

/// Primaries and persistors, fixed at startup and shared read-only by every
/// NOTIFY handled afterwards.
pub struct SecondaryTopology {
    primaries: Vec<PrimaryAddr>,
    persistors: Vec<Arc<dyn Persistor>>,
}

impl SecondaryTopology {
    pub fn new(primaries: Vec<PrimaryAddr>, persistors: Vec<Arc<dyn Persistor>>) -> Self {
        Self {
            primaries,
            persistors,
        }
    }

    pub fn primaries(&self) -> &[PrimaryAddr] {
        &self.primaries
    }

    /// Persistors in lookup order.
    pub fn persistors(&self) -> &[Arc<dyn Persistor>] {
        &self.persistors
    }
}

impl fmt::Debug for SecondaryTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.persistors.iter().map(|p| p.name()).collect();
        f.debug_struct("SecondaryTopology")
            .field("primaries", &self.primaries)
            .field("persistors", &names)
            .finish()
    }
}
