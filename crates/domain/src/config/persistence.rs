use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    Sqlite,
    Memory,
}

impl PersistenceBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// Backends in lookup order: the first one holding a SOA for a zone wins.
    #[serde(default = "default_backends")]
    pub backends: Vec<PersistenceBackend>,

    #[serde(default = "default_db_path")]
    pub database_path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backends: default_backends(),
            database_path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_backends() -> Vec<PersistenceBackend> {
    vec![PersistenceBackend::Sqlite]
}

fn default_db_path() -> String {
    "./zonesync.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}
