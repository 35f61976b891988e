//! nats-pub - publish a message to a subject

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nats_box::app::main_entry().await
}
