use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;
use zonesync_application::ports::SoaQueryResponse;
use zonesync_domain::{PrimaryAddr, SoaSnapshot};

pub const ZONE: &str = "example.com.";

pub fn primary(s: &str) -> PrimaryAddr {
    s.parse().unwrap()
}

pub fn soa_record(zone: &str, serial: u32) -> Record {
    let name = Name::from_str(zone).unwrap();
    let mname = Name::from_str(&format!("ns1.{}", zone)).unwrap();
    let rname = Name::from_str(&format!("hostmaster.{}", zone)).unwrap();
    let soa = SOA::new(mname, rname, serial, 3600, 900, 604800, 300);
    Record::from_rdata(name, 3600, RData::SOA(soa))
}

pub fn a_record(name: &str, ip: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), 300, RData::A(A(ip)))
}

pub fn known_soa(serial: u32) -> SoaSnapshot {
    SoaSnapshot::new(serial, "ns1.example.com.", "hostmaster.example.com.")
}

pub fn soa_answer(zone: &str, serial: u32) -> SoaQueryResponse {
    SoaQueryResponse {
        response_code: ResponseCode::NoError,
        answers: vec![soa_record(zone, serial)],
    }
}

pub fn rcode_answer(rcode: ResponseCode) -> SoaQueryResponse {
    SoaQueryResponse {
        response_code: rcode,
        answers: vec![],
    }
}

/// A full-zone record set the way an AXFR delivers it.
pub fn zone_records(zone: &str, serial: u32) -> Vec<Record> {
    vec![
        soa_record(zone, serial),
        a_record(&format!("www.{}", zone), Ipv4Addr::new(192, 0, 2, 10)),
        a_record(&format!("mail.{}", zone), Ipv4Addr::new(192, 0, 2, 25)),
        soa_record(zone, serial),
    ]
}

fn message_with_question(id: u16, op_code: OpCode, zone: &str) -> Message {
    let mut message = Message::new(id, MessageType::Query, op_code);
    message.add_query(Query::query(Name::from_str(zone).unwrap(), RecordType::SOA));
    message
}

pub fn notify_message(zone: &str) -> Message {
    let mut message = message_with_question(0x1234, OpCode::Notify, zone);
    message.set_authoritative(true);
    message
}

pub fn query_message(zone: &str) -> Message {
    message_with_question(0x4321, OpCode::Query, zone)
}
