//! Odds Feed Client - Main Library
//!
//! Binaries and shared binary helpers on top of the `oddsfeed` library.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **oddsfeed**: Feed parsing, caches and mapping (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use oddsfeed_client::bin_common::{load_config_from_env, ConfigType};
//! use oddsfeed_client::oddsfeed::FeedConfig;
//! ```

// Re-export workspace libraries for convenience
pub use oddsfeed;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
