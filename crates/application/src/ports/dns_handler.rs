use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use zonesync_domain::DomainError;

/// Writes replies back to whoever sent the inbound message.
#[async_trait]
pub trait ResponseSink: Send {
    async fn send(&mut self, response: &Message) -> Result<(), DomainError>;
}

/// A link in the request-handling chain.
///
/// The returned code describes the transaction; a handler that already wrote
/// its reply through the sink returns the code it wrote.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        request: &Message,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError>;
}
