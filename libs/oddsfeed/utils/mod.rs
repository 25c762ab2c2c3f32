//! Common utilities for feed binaries

mod shutdown;

pub use shutdown::ShutdownManager;
