#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub use config::SessionConfig;
pub use icmp::v4::{process_identifier, RawSocket, SequenceNumber, TSocket, Ttl};
pub use ping_error::{GenericError, PingError};
pub use ping_output::PingOutput;
pub use ping_runner::PingRunner;
pub use ping_session::{CycleOutcome, PingSession};
pub use resolve::lookup_host_v4;
pub use stats::{PingReport, RttSummary, SessionStats};
pub use stop_signal::StopSignal;
pub use timing::{delta_ms, Timestamp};

mod config;
pub mod icmp;
mod ping_error;
mod ping_output;
mod ping_runner;
mod ping_session;
mod resolve;
mod stats;
mod stop_signal;
mod timing;
