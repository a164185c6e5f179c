//! Zone transfer sessions over TCP (RFC 5936 AXFR, RFC 1995 IXFR).

use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix, TcpTransport};
use super::transport::{io_error, timeout_error};
use futures::stream;
use hickory_proto::rr::Record;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;
use zonesync_application::ports::{TransferEnvelope, TransferRequest, TransferStream};
use zonesync_domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XfrProgress {
    Continue,
    Done,
}

/// Watches the SOA records of a transfer to tell when it is complete.
///
/// The first answer must be the zone's current SOA (serial N). An AXFR-form
/// transfer ends on the second SOA with serial N; once an SOA with any other
/// serial shows up the transfer is IXFR-form and ends on the third. A reply
/// to IXFR holding nothing but the SOA means the requester is current.
#[derive(Debug)]
pub struct XfrTracker {
    incremental: bool,
    serial: Option<u32>,
    matching_soas: usize,
    axfr_form: bool,
}

impl XfrTracker {
    pub fn new(incremental: bool) -> Self {
        Self {
            incremental,
            serial: None,
            matching_soas: 0,
            axfr_form: true,
        }
    }

    pub fn observe(&mut self, answers: &[Record]) -> Result<XfrProgress, DomainError> {
        let serial = match self.serial {
            Some(serial) => serial,
            None => {
                let first = answers.first().ok_or_else(|| {
                    DomainError::InvalidDnsResponse("Zone transfer started without answers".into())
                })?;
                let serial = ResponseParser::soa_serial(first).ok_or_else(|| {
                    DomainError::InvalidDnsResponse(format!(
                        "Zone transfer must start with SOA, got {}",
                        first.record_type()
                    ))
                })?;
                self.serial = Some(serial);

                if self.incremental && answers.len() == 1 {
                    return Ok(XfrProgress::Done);
                }
                serial
            }
        };

        for record in answers {
            let Some(soa_serial) = ResponseParser::soa_serial(record) else {
                continue;
            };
            if soa_serial == serial {
                self.matching_soas += 1;
                if (self.axfr_form && self.matching_soas == 2) || self.matching_soas == 3 {
                    return Ok(XfrProgress::Done);
                }
            } else {
                self.axfr_form = false;
            }
        }

        Ok(XfrProgress::Continue)
    }

    pub fn is_axfr_form(&self) -> bool {
        self.axfr_form
    }
}

/// One transfer over one TCP connection, yielding one envelope per message.
pub struct XfrSession {
    stream: TcpStream,
    server: SocketAddr,
    expected_id: u16,
    read_timeout: Duration,
    tracker: XfrTracker,
    messages: usize,
    finished: bool,
}

impl XfrSession {
    /// Connects and sends the transfer query. Errors here mean no session.
    pub async fn open(
        server: SocketAddr,
        request: &TransferRequest,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let query = MessageBuilder::build_transfer(request)?;
        let mut stream = TcpTransport::connect(server, timeout).await?;

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, &query.bytes))
            .await
            .map_err(|_| timeout_error(server))?
            .map_err(|e| io_error(server, e))?;

        debug!(server = %server, zone = request.zone(), mode = request.mode(), "Transfer query sent");

        Ok(Self {
            stream,
            server,
            expected_id: query.id,
            read_timeout: timeout,
            tracker: XfrTracker::new(request.is_incremental()),
            messages: 0,
            finished: false,
        })
    }

    pub fn into_stream(self) -> TransferStream {
        Box::pin(stream::unfold(self, |mut session| async move {
            let envelope = session.next_envelope().await?;
            Some((envelope, session))
        }))
    }

    async fn next_envelope(&mut self) -> Option<TransferEnvelope> {
        if self.finished {
            return None;
        }

        let envelope = match self.read_message().await {
            Ok((answers, XfrProgress::Done)) => {
                self.finished = true;
                debug!(
                    server = %self.server,
                    messages = self.messages,
                    axfr_form = self.tracker.is_axfr_form(),
                    "Zone transfer complete"
                );
                TransferEnvelope::Records(answers)
            }
            Ok((answers, XfrProgress::Continue)) => TransferEnvelope::Records(answers),
            Err(e) => {
                self.finished = true;
                TransferEnvelope::Error(e)
            }
        };

        Some(envelope)
    }

    async fn read_message(&mut self) -> Result<(Vec<Record>, XfrProgress), DomainError> {
        let read =
            tokio::time::timeout(self.read_timeout, read_with_length_prefix(&mut self.stream))
                .await;
        let bytes = read
            .map_err(|_| timeout_error(self.server))?
            .map_err(|e| self.read_error(e))?;
        self.messages += 1;

        let message = ResponseParser::parse(&bytes, self.expected_id, self.server)?;
        ResponseParser::check_rcode(&message, self.server)?;

        let answers = message.answers().to_vec();
        let progress = self.tracker.observe(&answers)?;
        Ok((answers, progress))
    }

    fn read_error(&self, error: io::Error) -> DomainError {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            return DomainError::TransferFailed {
                server: self.server.to_string(),
                message: format!(
                    "connection closed after {} messages before the transfer completed",
                    self.messages
                ),
            };
        }
        io_error(self.server, error)
    }
}
