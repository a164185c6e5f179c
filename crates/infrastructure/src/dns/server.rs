//! Inbound side: turns raw DNS messages into [`DnsHandler`] calls and makes
//! sure every failure still gets an answer.

use super::message_builder::MessageBuilder;
use super::transport::tcp::send_with_length_prefix;
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use zonesync_application::ports::{DnsHandler, ResponseSink};
use zonesync_domain::DomainError;

/// Tail of the chain: this instance serves no zones, so anything that is not
/// a NOTIFY is refused.
pub struct RefusingHandler;

#[async_trait]
impl DnsHandler for RefusingHandler {
    fn name(&self) -> &'static str {
        "refuse"
    }

    async fn handle(
        &self,
        request: &Message,
        _sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        debug!(id = request.id(), op_code = ?request.op_code(), "Refusing request");
        Ok(ResponseCode::Refused)
    }
}

pub struct UdpResponseSink {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpResponseSink {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }
}

#[async_trait]
impl ResponseSink for UdpResponseSink {
    async fn send(&mut self, response: &Message) -> Result<(), DomainError> {
        let bytes = MessageBuilder::serialize_message(response)?;
        self.socket
            .send_to(&bytes, self.peer)
            .await
            .map_err(|e| DomainError::ResponseWriteFailed(format!("{}: {}", self.peer, e)))?;
        Ok(())
    }
}

/// Replies on a TCP connection shared by every in-flight request from it.
pub struct TcpResponseSink {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    peer: SocketAddr,
}

impl TcpResponseSink {
    pub fn new(writer: Arc<Mutex<OwnedWriteHalf>>, peer: SocketAddr) -> Self {
        Self { writer, peer }
    }
}

#[async_trait]
impl ResponseSink for TcpResponseSink {
    async fn send(&mut self, response: &Message) -> Result<(), DomainError> {
        let bytes = MessageBuilder::serialize_message(response)?;
        let mut writer = self.writer.lock().await;
        send_with_length_prefix(&mut *writer, &bytes)
            .await
            .map_err(|e| DomainError::ResponseWriteFailed(format!("{}: {}", self.peer, e)))
    }
}

/// Records whether the handler wrote anything.
struct TrackedSink<'a> {
    inner: &'a mut dyn ResponseSink,
    replied: bool,
}

#[async_trait]
impl ResponseSink for TrackedSink<'_> {
    async fn send(&mut self, response: &Message) -> Result<(), DomainError> {
        self.inner.send(response).await?;
        self.replied = true;
        Ok(())
    }
}

pub struct DnsServerHandler {
    handler: Arc<dyn DnsHandler>,
}

impl DnsServerHandler {
    pub fn new(handler: Arc<dyn DnsHandler>) -> Self {
        Self { handler }
    }

    /// Decodes `request_bytes`, runs the handler chain and returns the final
    /// response code. Errors become SERVFAIL; a failure code the handler did
    /// not write itself is written here.
    pub async fn handle_request(
        &self,
        request_bytes: &[u8],
        sink: &mut dyn ResponseSink,
    ) -> ResponseCode {
        let request = match Message::from_vec(request_bytes) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to decode request");
                if request_bytes.len() >= 2 {
                    let id = u16::from_be_bytes([request_bytes[0], request_bytes[1]]);
                    let mut reply = Message::new(id, MessageType::Response, OpCode::Query);
                    reply.set_response_code(ResponseCode::FormErr);
                    if let Err(e) = sink.send(&reply).await {
                        warn!(error = %e, "Failed to write FORMERR reply");
                    }
                }
                return ResponseCode::FormErr;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(id = request.id(), "Ignoring inbound response message");
            return ResponseCode::NoError;
        }

        let mut tracked = TrackedSink {
            inner: sink,
            replied: false,
        };

        let rcode = match self.handler.handle(&request, &mut tracked).await {
            Ok(rcode) => rcode,
            Err(e) => {
                error!(id = request.id(), handler = self.handler.name(), error = %e, "Request handling failed");
                ResponseCode::ServFail
            }
        };

        if rcode != ResponseCode::NoError && !tracked.replied {
            let reply = error_response(&request, rcode);
            if let Err(e) = tracked.inner.send(&reply).await {
                warn!(id = request.id(), error = %e, "Failed to write error reply");
            }
        }

        rcode
    }
}

/// Reply echoing the request's id, opcode and question with `rcode` set.
pub fn error_response(request: &Message, rcode: ResponseCode) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.add_queries(request.queries().to_vec());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_checking_disabled(request.checking_disabled());
    reply.set_response_code(rcode);
    reply
}
