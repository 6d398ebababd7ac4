//! LLM provider layer for Clinicbot.
//!
//! # Architecture
//!
//! - [`traits::ChatProvider`] — trait the agent loop talks to
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`http_provider::create_provider`] — builder from the loaded config

pub mod http_provider;
pub mod traits;

pub use http_provider::{create_provider, HttpProvider};
pub use traits::{ChatProvider, ChatRequestConfig};
