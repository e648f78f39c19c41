//! Logger installation for binaries built on this crate.
//!
//! The library itself only emits through the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
