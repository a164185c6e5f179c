//! Wire-format construction of the queries a secondary sends to its primaries.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::SOA;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use zonesync_application::ports::TransferRequest;
use zonesync_domain::{DomainError, SoaSnapshot};

/// A serialized query plus the id its response must echo.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub id: u16,
    pub bytes: Vec<u8>,
}

pub struct MessageBuilder;

impl MessageBuilder {
    /// SOA query for `zone`: random id, RD set, question `(zone, SOA, IN)`.
    pub fn build_soa_query(zone: &str) -> Result<BuiltQuery, DomainError> {
        let name = parse_name(zone)?;
        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question(name, RecordType::SOA));

        Ok(BuiltQuery {
            id,
            bytes: Self::serialize_message(&message)?,
        })
    }

    /// AXFR, or IXFR carrying the known SOA in the authority section
    /// (RFC 1995 §3).
    pub fn build_transfer(request: &TransferRequest) -> Result<BuiltQuery, DomainError> {
        let name = parse_name(request.zone())?;
        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        match request {
            TransferRequest::Full { .. } => {
                message.add_query(question(name, RecordType::AXFR));
            }
            TransferRequest::Incremental { known, .. } => {
                message.add_query(question(name.clone(), RecordType::IXFR));
                message.add_name_server(soa_record(name, known)?);
            }
        }

        Ok(BuiltQuery {
            id,
            bytes: Self::serialize_message(&message)?,
        })
    }

    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

fn parse_name(zone: &str) -> Result<Name, DomainError> {
    Name::from_str(zone)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid zone '{}': {}", zone, e)))
}

fn question(name: Name, record_type: RecordType) -> Query {
    let mut query = Query::query(name, record_type);
    query.set_query_class(DNSClass::IN);
    query
}

/// Only the serial matters to the primary; timers are zeroed.
fn soa_record(zone: Name, known: &SoaSnapshot) -> Result<Record, DomainError> {
    let soa = SOA::new(
        parse_name(&known.mname)?,
        parse_name(&known.rname)?,
        known.serial,
        0,
        0,
        0,
        0,
    );
    Ok(Record::from_rdata(zone, 0, RData::SOA(soa)))
}
