pub mod message_builder;
pub mod response_parser;
pub mod server;
pub mod transport;
pub mod xfr;
pub mod zone_transport;

pub use message_builder::MessageBuilder;
pub use response_parser::ResponseParser;
pub use server::{DnsServerHandler, RefusingHandler, TcpResponseSink, UdpResponseSink};
pub use zone_transport::HickoryZoneTransport;
