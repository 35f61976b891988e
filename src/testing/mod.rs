//! Testing utilities and mock implementations
//!
//! This module provides a mock transport for exercising the tool commands
//! without a NATS server.

pub mod mocks;

pub use mocks::*;
