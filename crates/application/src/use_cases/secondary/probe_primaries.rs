use super::selection::{FirstResponder, PrimarySelectionStrategy};
use crate::ports::ZoneTransport;
use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use tracing::{debug, error};
use zonesync_domain::{DomainError, PrimaryAddr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimarySoa {
    pub primary: PrimaryAddr,
    pub serial: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    /// The first primary that answered with a SOA.
    pub answer: Option<PrimarySoa>,
    /// Last error seen during the pass. Always `None` when `answer` is set; may
    /// also be `None` without an answer if every primary simply had no SOA.
    pub last_error: Option<DomainError>,
}

impl ProbeOutcome {
    pub fn found(&self) -> bool {
        self.answer.is_some()
    }
}

/// Asks each primary for the zone's SOA, one at a time, until one answers.
pub struct ProbePrimariesUseCase {
    transport: Arc<dyn ZoneTransport>,
    strategy: Arc<dyn PrimarySelectionStrategy>,
}

impl ProbePrimariesUseCase {
    pub fn new(transport: Arc<dyn ZoneTransport>) -> Self {
        Self {
            transport,
            strategy: Arc::new(FirstResponder),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn PrimarySelectionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub async fn execute(&self, zone: &str, primaries: &[PrimaryAddr]) -> ProbeOutcome {
        let mut last_error = None;
        debug!(
            zone = %zone,
            strategy = self.strategy.name(),
            primaries = primaries.len(),
            "Probing primaries"
        );

        for primary in self.strategy.order(zone, primaries) {
            let response = match self.transport.query_soa(zone, primary).await {
                Ok(response) => response,
                Err(e) => {
                    error!(primary = %primary, zone = %zone, error = %e, "There was an error contacting primary");
                    last_error = Some(e);
                    continue;
                }
            };

            if response.response_code != ResponseCode::NoError {
                error!(
                    primary = %primary,
                    zone = %zone,
                    rcode = ?response.response_code,
                    "Primary answered SOA query with a failure code"
                );
                last_error = Some(DomainError::UnexpectedResponseCode {
                    server: primary.to_string(),
                    rcode: format!("{:?}", response.response_code),
                });
                continue;
            }

            match response.first_soa_serial() {
                Some(serial) => {
                    debug!(primary = %primary, zone = %zone, serial, "Found primary with zone");
                    return ProbeOutcome {
                        answer: Some(PrimarySoa {
                            primary: primary.clone(),
                            serial,
                        }),
                        last_error: None,
                    };
                }
                None => {
                    debug!(primary = %primary, zone = %zone, "Primary has no SOA for zone");
                }
            }
        }

        ProbeOutcome {
            answer: None,
            last_error,
        }
    }
}
