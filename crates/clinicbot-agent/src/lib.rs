//! Clinicbot agent — the LLM ↔ tool loop and the booking tools.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, and the four booking tools
//! - **context**: system prompt and message list construction
//! - **agent_loop**: the LLM ↔ tool-calling main loop

pub mod agent_loop;
pub mod context;
pub mod tools;

pub use agent_loop::AgentLoop;
pub use context::ContextBuilder;
pub use tools::{Tool, ToolRegistry};
