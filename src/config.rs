use crate::PingError;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Settings of one ping session; fixed once the session starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Destination as given by the user.
    pub host: String,
    pub addr: Ipv4Addr,
    /// Print timeouts and ICMP messages not addressed to this session.
    pub verbose: bool,
    /// Upper bound of the wait for a reply within one cycle.
    pub timeout: Duration,
    /// Time from the start of one cycle to the start of the next.
    pub interval: Duration,
    /// Read timeout of the socket; a stop request is noticed within one poll interval.
    pub poll_interval: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, addr: Ipv4Addr) -> SessionConfig {
        SessionConfig {
            host: host.into(),
            addr,
            verbose: false,
            timeout: Duration::from_secs(1),
            interval: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn validate(&self) -> Result<(), PingError> {
        if self.timeout.is_zero() {
            return Err(PingError::new("timeout must be greater than zero"));
        }
        if self.interval.is_zero() {
            return Err(PingError::new("interval must be greater than zero"));
        }
        if self.poll_interval.is_zero() || self.poll_interval > self.timeout {
            return Err(PingError::new("poll interval must be greater than zero and at most the timeout"));
        }
        Ok(())
    }
}
