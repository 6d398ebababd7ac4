//! Agent tools: trait, registry, and the booking tool set.

pub mod base;
pub mod booking;
pub mod registry;

pub use base::Tool;
pub use booking::{AvailabilityTool, CurrentDateTool, ListProvidersTool, ListServicesTool};
pub use registry::ToolRegistry;
