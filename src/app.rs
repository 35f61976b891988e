//! Process entry point shared by every nats-box binary

use crate::cli::{parse_action, Action, Mode};
use crate::commands;
use crate::commands::Command;
use crate::error::{NatsBoxError, NatsBoxResult};
use crate::observability::{init_logging, LogSettings};
use crate::transport::nats::NatsClient;
use crate::transport::Transport;
use std::io::{self, Write};
use std::process::ExitCode;
use tokio::signal;
use tracing::{debug, error, info, warn};

/// Run with the real process arguments and environment
pub async fn main_entry() -> ExitCode {
    let argv = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    ExitCode::from(run(argv, |key| std::env::var(key).ok()).await)
}

/// Run one invocation and return the process exit status.
///
/// `argv` includes the program name, which selects the mode. Help, version
/// and usage text go to stderr like the rest of the tool's log output.
pub async fn run<I, F>(argv: I, env: F) -> u8
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut argv = argv.into_iter();
    let exe = argv.next().unwrap_or_default();
    let mode = Mode::from_exe_name(&exe);

    let invocation = match parse_action(mode, argv, &env) {
        Action::ShowHelp(text) => {
            eprint!("{text}");
            return 0;
        }
        Action::ShowVersion(banner) => {
            eprintln!("{banner}");
            return 0;
        }
        Action::Usage(text) => {
            eprint!("{text}");
            return 1;
        }
        Action::Run(invocation) => invocation,
    };

    init_logging(LogSettings::from_lookup(&env, invocation.timestamps));

    let result = match NatsClient::connect(&invocation.client).await {
        Ok(transport) => {
            execute_until_closed(&transport, &invocation.command, &mut io::stdout()).await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}

/// Execute a command while watching the connection.
///
/// Ends with an error when the connection is permanently closed. Subscriber
/// commands also end cleanly on Ctrl-C.
pub async fn execute_until_closed<T, W>(
    transport: &T,
    command: &Command,
    out: &mut W,
) -> NatsBoxResult<()>
where
    T: Transport,
    W: Write,
{
    let interruptible = command.keeps_running();

    tokio::select! {
        result = commands::execute(transport, command, out) => result,
        reason = monitor_connection_health(transport) => Err(NatsBoxError::Closed(reason)),
        _ = wait_for_interrupt(), if interruptible => {
            info!("Interrupted, exiting");
            Ok(())
        }
    }
}

/// Monitor the connection and return the reason once it is permanently closed
pub async fn monitor_connection_health<T: Transport>(transport: &T) -> String {
    let reason = transport.closed().await;
    debug!("Connection closed: {}", reason);
    reason
}

async fn wait_for_interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
