//! Core domain logic for the terminal interface.
//!
//! This module contains the business logic and data models that drive the
//! conversation session and the terminal UI, independent of the concrete
//! assistant service behind them.

pub mod models;
pub mod services;
