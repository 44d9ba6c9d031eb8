use crate::icmp::v4::{EchoReply, TSocket, ICMP_HEADER_SIZE, IPV4_HEADER_SIZE, PAYLOAD_SIZE};
use crate::ping_session::{CycleOutcome, PingSession};
use crate::timing::{delta_ms, Timestamp};
use crate::{PingError, PingReport, SessionConfig, StopSignal};
use std::io::{self, Write};

/// Drives a [`PingSession`] once per interval until a stop is requested, then prints the
/// final statistics.
pub struct PingRunner<S> {
    config: SessionConfig,
    session: PingSession<S>,
    stop: StopSignal,
}

impl<S> PingRunner<S>
where
    S: TSocket,
{
    pub fn new(config: SessionConfig, socket: S, identifier: u16, stop: StopSignal) -> Self {
        let session = PingSession::new(socket, identifier, &config, stop.clone());
        PingRunner { config, session, stop }
    }

    /// Runs until stopped. Consumes the runner so the socket is closed when it returns.
    pub fn run<W: Write>(self, out: &mut W) -> Result<PingReport, PingError> {
        let PingRunner { config, mut session, stop } = self;
        writeln!(
            out,
            "PING {} ({}) {}({}) bytes of data.",
            config.host,
            config.addr,
            PAYLOAD_SIZE,
            PAYLOAD_SIZE + ICMP_HEADER_SIZE + IPV4_HEADER_SIZE
        )?;

        let start_time = Timestamp::now();
        while !stop.is_stopped() {
            let cycle_start = Timestamp::now();
            let outcome = session.run_cycle();
            if matches!(outcome, CycleOutcome::Interrupted) {
                break;
            }
            write_outcome(out, &outcome, config.verbose)?;

            let pause = config.interval.saturating_sub(cycle_start.elapsed());
            if stop.wait_timeout(pause) {
                break;
            }
        }
        let end_time = Timestamp::now();
        tracing::trace!("ping loop stopped");

        let report = session.stats().render(&config.host, delta_ms(start_time, end_time));
        writeln!(out)?;
        writeln!(out, "{report}")?;
        out.flush()?;
        Ok(report)
    }
}

fn write_outcome<W: Write>(out: &mut W, outcome: &CycleOutcome, verbose: bool) -> io::Result<()> {
    match outcome {
        CycleOutcome::Matched(output) => writeln!(out, "{output}"),
        CycleOutcome::Foreign(reply) => {
            let EchoReply { icmp_type, icmp_code, source, .. } = reply;
            tracing::debug!("ignoring ICMP type={} code={} from {}", icmp_type, icmp_code, source);
            if verbose {
                writeln!(out, "ICMP type={icmp_type} code={icmp_code} received from {source}")?;
            }
            Ok(())
        }
        CycleOutcome::TimedOut(sequence_number) => {
            if verbose {
                writeln!(out, "Request timeout for icmp_seq {sequence_number}")?;
            }
            Ok(())
        }
        CycleOutcome::Malformed(e) => {
            tracing::warn!("discarding datagram: {}", e);
            Ok(())
        }
        CycleOutcome::SendFailed(e) => {
            tracing::error!("sendto: {}", e);
            Ok(())
        }
        CycleOutcome::RecvFailed(e) => {
            tracing::error!("recvfrom: {}", e);
            Ok(())
        }
        CycleOutcome::Interrupted => Ok(()),
    }
}
