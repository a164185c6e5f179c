use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::primary::{PrimaryAddr, TransportProtocol};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecondaryConfig {
    /// Primaries queried, in order, for any notified zone.
    #[serde(default, deserialize_with = "deserialize_primaries")]
    pub primaries: Vec<String>,

    /// Transport used for SOA probes when a primary has no `udp://`/`tcp://` prefix.
    #[serde(default = "default_probe_protocol")]
    pub probe_protocol: String,

    /// Seconds to wait for a SOA probe answer.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: u64,

    /// Seconds to wait for each message of a zone transfer.
    #[serde(default = "default_transfer_timeout")]
    pub transfer_timeout: u64,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            primaries: Vec::new(),
            probe_protocol: default_probe_protocol(),
            probe_timeout: default_probe_timeout(),
            transfer_timeout: default_transfer_timeout(),
        }
    }
}

impl SecondaryConfig {
    pub fn default_protocol(&self) -> Result<TransportProtocol, ConfigError> {
        self.probe_protocol
            .parse::<TransportProtocol>()
            .map_err(ConfigError::Validation)
    }

    pub fn parsed_primaries(&self) -> Result<Vec<PrimaryAddr>, ConfigError> {
        let protocol = self.default_protocol()?;
        self.primaries
            .iter()
            .map(|p| {
                PrimaryAddr::parse_with_default(p, protocol)
                    .map_err(|e| ConfigError::InvalidPrimary(p.clone(), e))
            })
            .collect()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout)
    }
}

/// Splits whitespace-separated entries so both `primaries = ["a", "b"]` and
/// `primaries = "a b"` are accepted.
pub fn split_primaries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .flat_map(|e| {
            e.as_ref()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrimariesField {
    One(String),
    Many(Vec<String>),
}

fn deserialize_primaries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PrimariesField::deserialize(deserializer)? {
        PrimariesField::One(s) => split_primaries([s]),
        PrimariesField::Many(v) => split_primaries(v),
    })
}

fn default_probe_protocol() -> String {
    "udp".to_string()
}

fn default_probe_timeout() -> u64 {
    3
}

fn default_transfer_timeout() -> u64 {
    30
}
