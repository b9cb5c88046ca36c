//! Configuration management for the terminal interface.
//!
//! Defaults, an optional `config.toml`, and command-line flags are merged in
//! that order into a process-wide map. The API credential is deliberately not
//! part of this: it only ever comes from the environment.

mod config;

pub use config::*;
