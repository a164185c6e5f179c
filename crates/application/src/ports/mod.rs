mod dns_handler;
mod persistor;
mod zone_transport;

pub use dns_handler::{DnsHandler, ResponseSink};
pub use persistor::Persistor;
pub use zone_transport::{
    SoaQueryResponse, TransferEnvelope, TransferRequest, TransferStream, ZoneTransport,
};
