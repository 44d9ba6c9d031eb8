use std::fmt;

/// Running latency and loss counters of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    transmitted: u64,
    received: u64,
    rtt_min: f64,
    rtt_max: f64,
    rtt_sum: f64,
    rtt_sum2: f64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn new() -> Self {
        SessionStats {
            transmitted: 0,
            received: 0,
            rtt_min: f64::INFINITY,
            rtt_max: 0.0,
            rtt_sum: 0.0,
            rtt_sum2: 0.0,
        }
    }

    pub fn transmitted(&self) -> u64 {
        self.transmitted
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Counts one Echo Request handed to the socket.
    pub fn note_transmitted(&mut self) {
        self.transmitted += 1;
    }

    /// Counts one matched reply with the given round-trip time.
    pub fn record(&mut self, rtt_ms: f64) {
        self.received += 1;
        self.rtt_min = self.rtt_min.min(rtt_ms);
        self.rtt_max = self.rtt_max.max(rtt_ms);
        self.rtt_sum += rtt_ms;
        self.rtt_sum2 += rtt_ms * rtt_ms;
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn loss_percent(&self) -> f64 {
        if self.transmitted == 0 {
            return 0.0;
        }
        let lost = self.transmitted.saturating_sub(self.received);
        100.0 * lost as f64 / self.transmitted as f64
    }

    /// Round-trip summary, or `None` before the first matched reply.
    #[allow(clippy::cast_precision_loss)]
    pub fn rtt_summary(&self) -> Option<RttSummary> {
        if self.received == 0 {
            return None;
        }
        let n = self.received as f64;
        let avg = self.rtt_sum / n;
        // Rounding can push the variance of near-identical samples slightly below zero.
        let variance = (self.rtt_sum2 / n - avg * avg).max(0.0);
        Some(RttSummary { min: self.rtt_min, avg, max: self.rtt_max, mdev: variance.sqrt() })
    }

    pub fn render(&self, host: &str, elapsed_ms: f64) -> PingReport {
        PingReport {
            host: host.to_owned(),
            transmitted: self.transmitted,
            received: self.received,
            loss_percent: self.loss_percent(),
            elapsed_ms,
            rtt: self.rtt_summary(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RttSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    /// Population standard deviation of the samples.
    pub mdev: f64,
}

/// Final statistics block printed when a session ends.
#[derive(Clone, Debug, PartialEq)]
pub struct PingReport {
    pub host: String,
    pub transmitted: u64,
    pub received: u64,
    pub loss_percent: f64,
    pub elapsed_ms: f64,
    pub rtt: Option<RttSummary>,
}

impl fmt::Display for PingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ping statistics ---", self.host)?;
        write!(
            f,
            "{} packets transmitted, {} received, {:.0}% packet loss, time {:.0}ms",
            self.transmitted, self.received, self.loss_percent, self.elapsed_ms
        )?;
        if let Some(RttSummary { min, avg, max, mdev }) = self.rtt {
            write!(f, "\nrtt min/avg/max/mdev = {min:.3}/{avg:.3}/{max:.3}/{mdev:.3} ms")?;
        }
        Ok(())
    }
}
