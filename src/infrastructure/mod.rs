//! Infrastructure layer providing external integrations.
//!
//! This module contains the concrete clients for the remote assistant
//! service. Everything above it talks through the `AssistantBackend` trait.

pub mod clients;
