//! nats-req - send a request and print the reply

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nats_box::app::main_entry().await
}
