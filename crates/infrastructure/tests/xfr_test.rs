mod helpers;

use futures::StreamExt;
use helpers::{a, axfr_records, known_soa, reply, script, soa, MockPrimary, ZONE};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, Record, RecordType};
use std::time::Duration;
use zonesync_application::ports::{TransferEnvelope, TransferRequest, ZoneTransport};
use zonesync_domain::{DomainError, PrimaryAddr};
use zonesync_infrastructure::dns::HickoryZoneTransport;

fn transport() -> HickoryZoneTransport {
    HickoryZoneTransport::new(Duration::from_millis(500), Duration::from_millis(500))
}

async fn drain(primary: &MockPrimary, request: TransferRequest) -> Vec<TransferEnvelope> {
    // Transfers always run over TCP whatever the probe protocol is.
    let stream = transport()
        .open_transfer(&request, &PrimaryAddr::udp(primary.addr()))
        .await
        .unwrap();
    stream.collect().await
}

fn records_of(envelopes: &[TransferEnvelope]) -> Vec<Record> {
    envelopes
        .iter()
        .filter_map(|e| match e {
            TransferEnvelope::Records(records) => Some(records.clone()),
            TransferEnvelope::Error(_) => None,
        })
        .flatten()
        .collect()
}

#[tokio::test]
async fn test_axfr_in_a_single_message() {
    let primary =
        MockPrimary::start(script(|query| vec![reply(query, axfr_records(7))])).await;

    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, None)).await;

    assert_eq!(envelopes.len(), 1);
    assert_eq!(records_of(&envelopes), axfr_records(7));
    assert_eq!(
        primary.received()[0].queries()[0].query_type(),
        RecordType::AXFR
    );
}

#[tokio::test]
async fn test_axfr_split_over_messages_yields_one_envelope_each() {
    let primary = MockPrimary::start(script(|query| {
        vec![
            reply(query, vec![soa(ZONE, 7), a("www", 1)]),
            reply(query, vec![a("mail", 2)]),
            reply(query, vec![a("ftp", 3), soa(ZONE, 7)]),
        ]
    }))
    .await;

    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, None)).await;

    assert_eq!(envelopes.len(), 3);
    assert!(envelopes
        .iter()
        .all(|e| matches!(e, TransferEnvelope::Records(_))));
    assert_eq!(records_of(&envelopes).len(), 5);
}

#[tokio::test]
async fn test_ixfr_request_carries_known_soa() {
    let primary = MockPrimary::start(script(|query| {
        vec![reply(
            query,
            vec![
                soa(ZONE, 8),
                soa(ZONE, 7),
                a("www", 1),
                soa(ZONE, 8),
                a("www", 9),
                soa(ZONE, 8),
            ],
        )]
    }))
    .await;

    let known = known_soa(7);
    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, Some(&known))).await;

    assert_eq!(records_of(&envelopes).len(), 6);

    let query = &primary.received()[0];
    assert_eq!(query.queries()[0].query_type(), RecordType::IXFR);
    match query.name_servers()[0].data() {
        RData::SOA(soa) => assert_eq!(soa.serial(), 7),
        other => panic!("expected SOA in authority, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ixfr_up_to_date_reply_ends_transfer() {
    let primary =
        MockPrimary::start(script(|query| vec![reply(query, vec![soa(ZONE, 7)])])).await;

    let known = known_soa(7);
    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, Some(&known))).await;

    assert_eq!(envelopes.len(), 1);
    assert_eq!(records_of(&envelopes), vec![soa(ZONE, 7)]);
}

#[tokio::test]
async fn test_connection_closed_early_yields_final_error() {
    let primary = MockPrimary::start(script(|query| {
        vec![reply(query, vec![soa(ZONE, 7), a("www", 1)])]
    }))
    .await;

    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, None)).await;

    assert_eq!(envelopes.len(), 2);
    assert!(matches!(envelopes[0], TransferEnvelope::Records(_)));
    assert!(matches!(
        envelopes[1],
        TransferEnvelope::Error(DomainError::TransferFailed { .. })
    ));
}

#[tokio::test]
async fn test_failure_rcode_becomes_error_envelope() {
    let primary = MockPrimary::start(script(|query| {
        let mut message = reply(query, vec![]);
        message.set_response_code(ResponseCode::NotAuth);
        vec![message]
    }))
    .await;

    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, None)).await;

    assert_eq!(envelopes.len(), 1);
    assert!(matches!(
        envelopes[0],
        TransferEnvelope::Error(DomainError::UnexpectedResponseCode { .. })
    ));
}

#[tokio::test]
async fn test_id_mismatch_becomes_error_envelope() {
    let primary = MockPrimary::start(script(|query| {
        let mut message = reply(query, axfr_records(7));
        let mut header = *message.header();
        header.set_id(query.id().wrapping_add(1));
        message.set_header(header);
        vec![message]
    }))
    .await;

    let envelopes = drain(&primary, TransferRequest::for_zone(ZONE, None)).await;

    assert_eq!(envelopes.len(), 1);
    assert!(matches!(
        envelopes[0],
        TransferEnvelope::Error(DomainError::InvalidDnsResponse(_))
    ));
}

#[tokio::test]
async fn test_open_transfer_to_closed_port_fails_without_stream() {
    let addr = helpers::closed_port().await;

    let result = transport()
        .open_transfer(&TransferRequest::for_zone(ZONE, None), &PrimaryAddr::tcp(addr))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::TransportConnectionRefused { .. })
    ));
}
