use super::Persistors;
use std::sync::Arc;
use tracing::info;
use zonesync_application::ports::DnsHandler;
use zonesync_application::use_cases::{HandleNotifyUseCase, SecondaryTopology};
use zonesync_domain::Config;
use zonesync_infrastructure::dns::{DnsServerHandler, HickoryZoneTransport, RefusingHandler};

pub struct SecondaryServices {
    pub topology: Arc<SecondaryTopology>,
    pub dispatcher: Arc<HandleNotifyUseCase>,
}

impl SecondaryServices {
    pub fn new(config: &Config, persistors: Persistors) -> anyhow::Result<Self> {
        let primaries = config.secondary.parsed_primaries()?;
        info!(
            primaries = primaries.len(),
            persistors = persistors.backends.len(),
            "Initializing secondary"
        );

        let topology = Arc::new(SecondaryTopology::new(primaries, persistors.backends));

        let transport = Arc::new(HickoryZoneTransport::new(
            config.secondary.probe_timeout(),
            config.secondary.transfer_timeout(),
        ));

        let dispatcher = Arc::new(
            HandleNotifyUseCase::new(Arc::clone(&topology), transport)
                .with_next(Arc::new(RefusingHandler)),
        );

        Ok(Self {
            topology,
            dispatcher,
        })
    }

    pub fn server_handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(Arc::clone(&self.dispatcher) as Arc<dyn DnsHandler>)
    }
}
