use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{RData, Record};
use std::net::SocketAddr;
use tracing::debug;
use zonesync_application::ports::SoaQueryResponse;
use zonesync_domain::DomainError;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes a reply and checks it answers the query with `expected_id`.
    pub fn parse(
        response_bytes: &[u8],
        expected_id: u16,
        server: SocketAddr,
    ) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!(
                "Failed to parse DNS response from {}: {}",
                server, e
            ))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Message from {} is not a response",
                server
            )));
        }

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response id {} from {} does not match query id {}",
                message.id(),
                server,
                expected_id
            )));
        }

        debug!(
            server = %server,
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            authority = message.name_servers().len(),
            "DNS response parsed"
        );

        Ok(message)
    }

    pub fn check_rcode(message: &Message, server: SocketAddr) -> Result<(), DomainError> {
        match message.response_code() {
            ResponseCode::NoError => Ok(()),
            rcode => Err(DomainError::UnexpectedResponseCode {
                server: server.to_string(),
                rcode: format!("{:?}", rcode),
            }),
        }
    }

    pub fn soa_response(message: &Message) -> SoaQueryResponse {
        SoaQueryResponse {
            response_code: message.response_code(),
            answers: message.answers().to_vec(),
        }
    }

    pub fn soa_serial(record: &Record) -> Option<u32> {
        match record.data() {
            RData::SOA(soa) => Some(soa.serial()),
            _ => None,
        }
    }
}
