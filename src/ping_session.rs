use crate::icmp::v4::{EchoReply, EchoRequest, IcmpV4, Received, SequenceNumber, TSocket};
use crate::timing::delta_ms;
use crate::{PingError, PingOutput, SessionConfig, SessionStats, StopSignal};
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// How one send/await cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A reply carrying this session's identifier; counted in the statistics.
    Matched(PingOutput),
    /// An ICMP message for someone else. At most one datagram is read per cycle, so a
    /// foreign message ends the cycle.
    Foreign(EchoReply),
    /// Nothing arrived within the timeout.
    TimedOut(SequenceNumber),
    /// A datagram that could not be decoded: too short for the IPv4 and ICMP headers,
    /// or not from an IPv4 peer.
    Malformed(PingError),
    /// The request could not be transmitted; it is not counted as transmitted.
    SendFailed(PingError),
    RecvFailed(PingError),
    /// A stop was requested while waiting for the reply.
    Interrupted,
}

/// Owns the socket and the statistics; runs one Echo exchange at a time.
pub struct PingSession<S> {
    icmpv4: IcmpV4<S>,
    destination: Ipv4Addr,
    next_sequence_number: SequenceNumber,
    timeout: Duration,
    poll_interval: Duration,
    stop: StopSignal,
    stats: SessionStats,
}

impl<S> PingSession<S>
where
    S: TSocket,
{
    pub fn new(socket: S, identifier: u16, config: &SessionConfig, stop: StopSignal) -> Self {
        PingSession {
            icmpv4: IcmpV4::new(socket, identifier),
            destination: config.addr,
            next_sequence_number: SequenceNumber::start_value(),
            timeout: config.timeout,
            poll_interval: config.poll_interval,
            stop,
            stats: SessionStats::new(),
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.send_request() {
            Ok(request) => self.await_reply(&request),
            Err(e) => CycleOutcome::SendFailed(e),
        }
    }

    fn send_request(&mut self) -> Result<EchoRequest, PingError> {
        // A failed attempt still uses up its sequence number.
        let sequence_number = self.next_sequence_number;
        self.next_sequence_number = sequence_number.next();

        let request = self.icmpv4.send_to(self.destination, sequence_number)?;
        self.stats.note_transmitted();
        Ok(request)
    }

    /// Waits for one datagram in reads of at most `poll_interval`, none of which extends past
    /// the deadline, so a stop request is seen within one read.
    fn await_reply(&mut self, request: &EchoRequest) -> CycleOutcome {
        let deadline = request.send_time + self.timeout;
        loop {
            if self.stop.is_stopped() {
                tracing::trace!("wait for icmp_seq={} interrupted", request.sequence_number);
                return CycleOutcome::Interrupted;
            }
            let remaining = deadline.remaining();
            if remaining.is_zero() {
                return CycleOutcome::TimedOut(request.sequence_number);
            }
            if let Err(e) = self.icmpv4.set_read_timeout(remaining.min(self.poll_interval)) {
                return CycleOutcome::RecvFailed(e.into());
            }
            match self.icmpv4.try_receive() {
                Ok(Received::Reply(reply)) => return self.handle_reply(request, reply),
                Ok(Received::Malformed(e)) => return CycleOutcome::Malformed(e),
                Ok(Received::Nothing) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return CycleOutcome::RecvFailed(e.into()),
            }
        }
    }

    fn handle_reply(&mut self, request: &EchoRequest, reply: EchoReply) -> CycleOutcome {
        if !reply.is_reply_to(self.icmpv4.identifier()) {
            return CycleOutcome::Foreign(reply);
        }
        // Matching is by identifier only; the reply is timed against the latest request
        // whatever sequence number it echoes.
        let rtt_ms = delta_ms(request.send_time, reply.receive_time);
        self.stats.record(rtt_ms);
        CycleOutcome::Matched(PingOutput {
            package_size: reply.package_size,
            ip_addr: IpAddr::V4(reply.source),
            ttl: reply.ttl,
            sequence_number: reply.sequence_number,
            rtt_ms,
        })
    }
}
