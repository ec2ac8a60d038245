//! The node daemon: configuration and the JSON-RPC service.
pub mod config;
pub mod endpoint;
