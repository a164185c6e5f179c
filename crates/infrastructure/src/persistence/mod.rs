pub mod memory;
pub mod sqlite;
pub mod zone_update;

pub use memory::MemoryPersistor;
pub use sqlite::SqlitePersistor;
pub use zone_update::{apply_transfer, zone_soa};

/// Persistors key zones by their lowercase, fully qualified name.
pub fn zone_key(zone: &str) -> String {
    let mut key = zone.trim().to_ascii_lowercase();
    if !key.ends_with('.') {
        key.push('.');
    }
    key
}
