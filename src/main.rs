//! nats-box - publish, subscribe, request and reply over NATS
//!
//! Acts as `nats-pub` unless invoked under another tool's name, e.g. through
//! a `nats-sub` symlink.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nats_box::app::main_entry().await
}
