//! Clinicbot core — shared chat/tool-call types, configuration, and utilities.
//!
//! Everything here is dependency-light so that the booking client, the
//! provider layer, and the agent loop can all build on the same vocabulary.

pub mod config;
pub mod types;
pub mod utils;

pub use config::Config;
