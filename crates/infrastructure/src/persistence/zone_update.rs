//! Interpretation of a transferred record set against what is stored.
//!
//! Stored zones are kept SOA first, without the trailing SOA of the transfer.

use hickory_proto::rr::{RData, Record};
use zonesync_domain::{DomainError, SoaSnapshot};

/// Applies `transferred` on top of `stored` and returns the new zone contents.
///
/// - a lone SOA (an IXFR "you are current" reply) replaces just the SOA, and
///   only when the stored zone is already at that serial;
/// - AXFR-form sets (`SOA, records.., SOA`) replace the zone;
/// - IXFR-form sets (`SOA new, SOA old, deletions.., SOA, additions.., .., SOA new`)
///   are applied sequence by sequence (RFC 1995 §4), starting from a stored
///   zone at the `old` serial.
///
/// A set that does not end with the leading SOA's serial is incomplete and is
/// rejected, leaving the caller's stored zone as it was.
pub fn apply_transfer(stored: &[Record], transferred: &[Record]) -> Result<Vec<Record>, DomainError> {
    let Some(first) = transferred.first() else {
        return Err(DomainError::InvalidDnsResponse(
            "Refusing to apply an empty transfer".to_string(),
        ));
    };
    let Some(new_serial) = soa_serial(first) else {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Transfer must start with SOA, got {}",
            first.record_type()
        )));
    };
    let stored_serial = zone_soa(stored).map(|soa| soa.serial);

    if transferred.len() == 1 {
        if stored_serial != Some(new_serial) {
            return Err(DomainError::SerialMismatch {
                expected: new_serial,
                stored: stored_serial,
            });
        }
        let mut zone = Vec::with_capacity(stored.len());
        zone.push(first.clone());
        zone.extend(stored.iter().filter(|r| soa_serial(r).is_none()).cloned());
        return Ok(zone);
    }

    let end = transferred.len() - 1;
    if transferred.last().and_then(soa_serial) != Some(new_serial) {
        return Err(DomainError::IncompleteTransfer(format!(
            "{} records received, no closing SOA with serial {}",
            transferred.len(),
            new_serial
        )));
    }

    let base_serial = transferred[1..end].first().and_then(soa_serial);
    let ixfr_form = base_serial.is_some_and(|serial| serial != new_serial);
    if !ixfr_form {
        return Ok(transferred[..end].to_vec());
    }

    if stored_serial != base_serial {
        return Err(DomainError::SerialMismatch {
            expected: base_serial.unwrap_or_default(),
            stored: stored_serial,
        });
    }

    // Body between the leading and trailing SOA. Each SOA flips between the
    // deletion and the addition half of a difference sequence.
    let body = &transferred[1..end];
    if body.iter().filter(|r| soa_serial(r).is_some()).count() % 2 != 0 {
        return Err(DomainError::IncompleteTransfer(format!(
            "difference sequence towards serial {} has no addition half",
            new_serial
        )));
    }

    let mut records: Vec<Record> = stored
        .iter()
        .filter(|r| soa_serial(r).is_none())
        .cloned()
        .collect();

    let mut deleting = false;
    for record in body {
        if soa_serial(record).is_some() {
            deleting = !deleting;
            continue;
        }
        if deleting {
            if let Some(pos) = records.iter().position(|r| same_rr(r, record)) {
                records.remove(pos);
            }
        } else {
            match records.iter_mut().find(|r| same_rr(r, record)) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
        }
    }

    let mut zone = Vec::with_capacity(records.len() + 1);
    zone.push(first.clone());
    zone.extend(records);
    Ok(zone)
}

/// SOA snapshot of a stored zone, taken from its first record.
pub fn zone_soa(zone: &[Record]) -> Option<SoaSnapshot> {
    match zone.first()?.data() {
        RData::SOA(soa) => Some(SoaSnapshot::new(
            soa.serial(),
            soa.mname().to_utf8(),
            soa.rname().to_utf8(),
        )),
        _ => None,
    }
}

fn soa_serial(record: &Record) -> Option<u32> {
    match record.data() {
        RData::SOA(soa) => Some(soa.serial()),
        _ => None,
    }
}

/// RR identity ignoring TTL.
fn same_rr(a: &Record, b: &Record) -> bool {
    a.name() == b.name()
        && a.record_type() == b.record_type()
        && a.dns_class() == b.dns_class()
        && a.data() == b.data()
}
