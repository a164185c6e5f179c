use crate::serial::is_older;
use std::sync::Arc;

/// Authoritative state of a zone at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaSnapshot {
    pub serial: u32,
    /// Primary nameserver (SOA MNAME).
    pub mname: Arc<str>,
    /// Responsible mailbox (SOA RNAME).
    pub rname: Arc<str>,
}

impl SoaSnapshot {
    pub fn new(serial: u32, mname: impl Into<Arc<str>>, rname: impl Into<Arc<str>>) -> Self {
        Self {
            serial,
            mname: mname.into(),
            rname: rname.into(),
        }
    }

    /// Whether a primary reporting `upstream_serial` holds a newer version of the zone.
    pub fn is_stale_against(&self, upstream_serial: u32) -> bool {
        is_older(self.serial, upstream_serial)
    }
}

/// Decides whether a zone needs a transfer given the locally known SOA and the
/// serial reported by a primary. A missing known SOA always needs one.
pub fn needs_transfer(known: Option<&SoaSnapshot>, upstream_serial: u32) -> bool {
    match known {
        None => true,
        Some(soa) => soa.is_stale_against(upstream_serial),
    }
}
