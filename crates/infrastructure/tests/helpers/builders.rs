#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;
use zonesync_domain::SoaSnapshot;

pub const ZONE: &str = "example.com.";

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn soa(zone: &str, serial: u32) -> Record {
    let soa = SOA::new(
        name(&format!("ns1.{}", zone)),
        name(&format!("hostmaster.{}", zone)),
        serial,
        3600,
        900,
        604800,
        300,
    );
    Record::from_rdata(name(zone), 3600, RData::SOA(soa))
}

pub fn a(host: &str, last_octet: u8) -> Record {
    Record::from_rdata(
        name(&format!("{}.{}", host, ZONE)),
        300,
        RData::A(A::new(192, 0, 2, last_octet)),
    )
}

pub fn known_soa(serial: u32) -> SoaSnapshot {
    SoaSnapshot::new(serial, "ns1.example.com.", "hostmaster.example.com.")
}

/// `SOA, www, mail, SOA` as a primary would send it for AXFR.
pub fn axfr_records(serial: u32) -> Vec<Record> {
    vec![soa(ZONE, serial), a("www", 1), a("mail", 2), soa(ZONE, serial)]
}

/// Authoritative reply to `query` carrying `answers`.
pub fn reply(query: &Message, answers: Vec<Record>) -> Message {
    let mut message = Message::new(query.id(), MessageType::Response, query.op_code());
    message.add_queries(query.queries().to_vec());
    message.set_authoritative(true);
    for record in answers {
        message.add_answer(record);
    }
    message
}

pub fn notify(zone: &str, id: u16) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Notify);
    message.set_authoritative(true);
    message.add_query(Query::query(name(zone), RecordType::SOA));
    message
}

pub fn query(zone: &str, id: u16) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name(zone), RecordType::A));
    message
}
