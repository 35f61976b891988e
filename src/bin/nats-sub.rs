//! nats-sub - subscribe to a subject and print incoming messages

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nats_box::app::main_entry().await
}
