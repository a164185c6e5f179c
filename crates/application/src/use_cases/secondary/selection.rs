use zonesync_domain::PrimaryAddr;

/// Decides the order in which primaries are probed. The prober stops at the
/// first primary that answers with a SOA, so the order is the selection.
pub trait PrimarySelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn order<'a>(&self, zone: &str, primaries: &'a [PrimaryAddr]) -> Vec<&'a PrimaryAddr>;
}

/// Probes primaries in configuration order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstResponder;

impl PrimarySelectionStrategy for FirstResponder {
    fn name(&self) -> &'static str {
        "first-responder"
    }

    fn order<'a>(&self, _zone: &str, primaries: &'a [PrimaryAddr]) -> Vec<&'a PrimaryAddr> {
        primaries.iter().collect()
    }
}
