//! nats-rply - answer requests on a subject as part of a queue group

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nats_box::app::main_entry().await
}
