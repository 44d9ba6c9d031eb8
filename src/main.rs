use std::process::ExitCode;

use ft_ping::{
    lookup_host_v4, process_identifier, GenericError, PingError, PingRunner, RawSocket, SessionConfig, StopSignal,
};
use tracing_subscriber::FmtSubscriber;

#[derive(argh::FromArgs)]
/// ft_ping - send ICMP ECHO_REQUEST packets to an IPv4 host until interrupted
struct Args {
    #[argh(switch, short = 'v')]
    /// verbose output: report timeouts and ICMP messages meant for other processes
    verbose: bool,

    #[argh(option, default = "tracing::Level::WARN")]
    /// level of diagnostics written to stderr (error, warn, info, debug, trace)
    log_level: tracing::Level,

    #[argh(positional)]
    /// host name or IPv4 address
    host: String,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("ft_ping: could not install log subscriber: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ft_ping: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), GenericError> {
    let addr = lookup_host_v4(&args.host)?;
    let config = SessionConfig { verbose: args.verbose, ..SessionConfig::new(args.host, addr) };
    config.validate()?;
    tracing::debug!("pinging {} ({})", config.host, config.addr);

    let socket = RawSocket::new(config.poll_interval)
        .map_err(|e| PingError::with_source("could not open raw ICMP socket", e))?;

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.stop())?;

    let runner = PingRunner::new(config, socket, process_identifier(), stop);
    runner.run(&mut std::io::stdout().lock())?;
    Ok(())
}
