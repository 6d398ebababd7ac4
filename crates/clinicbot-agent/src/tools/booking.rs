//! Booking tools — the four functions the LLM can call.
//!
//! Thin adapters from LLM tool-call parameters to `BookingClient` calls.
//! Results are JSON-serialized for the model; failures propagate as `Err`
//! and the registry turns them into error strings, so the model can tell
//! the user the booking system is unreachable instead of claiming the
//! calendar is empty.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use clinicbot_booking::{AvailabilityQuery, BookingClient};
use clinicbot_core::utils::current_timestamp;

use super::base::{require_i64, require_id_list, require_string, Tool};

// ─────────────────────────────────────────────
// CurrentDateTool
// ─────────────────────────────────────────────

/// Reports the current date and time so the model can resolve relative
/// phrases like "tomorrow" or "end of the month".
pub struct CurrentDateTool;

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &str {
        "get_current_date"
    }

    fn description(&self) -> &str {
        "Get the current date and time in the format YYYY-MM-DDTHH:MM:SSZ. \
         Use this to resolve relative dates like tomorrow, this week, or end of the month."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, _params: HashMap<String, Value>) -> anyhow::Result<String> {
        Ok(current_timestamp())
    }
}

// ─────────────────────────────────────────────
// ListServicesTool
// ─────────────────────────────────────────────

/// Lists the clinic's bookable services.
pub struct ListServicesTool {
    client: Arc<BookingClient>,
}

impl ListServicesTool {
    pub fn new(client: Arc<BookingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListServicesTool {
    fn name(&self) -> &str {
        "get_services"
    }

    fn description(&self) -> &str {
        "List the services the clinic offers. Returns a JSON array of \
         {id, name} objects. The ids are internal — never show them to the user."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, _params: HashMap<String, Value>) -> anyhow::Result<String> {
        let services = self.client.services().await?;
        debug!(count = services.len(), "fetched services");
        Ok(serde_json::to_string(&services)?)
    }
}

// ─────────────────────────────────────────────
// ListProvidersTool
// ─────────────────────────────────────────────

/// Lists the providers who perform one service.
pub struct ListProvidersTool {
    client: Arc<BookingClient>,
}

impl ListProvidersTool {
    pub fn new(client: Arc<BookingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListProvidersTool {
    fn name(&self) -> &str {
        "get_providers"
    }

    fn description(&self) -> &str {
        "List the providers (staff members) who can perform a given service. \
         Returns a JSON array of {id, name} objects. The ids are internal — \
         never show them to the user."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "service": {
                    "type": "integer",
                    "description": "Id of the service to look up providers for"
                }
            },
            "required": ["service"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let service = require_i64(&params, "service")?;
        let providers = self.client.providers(service).await?;
        debug!(service = service, count = providers.len(), "fetched providers");
        Ok(serde_json::to_string(&providers)?)
    }
}

// ─────────────────────────────────────────────
// AvailabilityTool
// ─────────────────────────────────────────────

/// Looks up free slots for a date range and service/provider id sets.
pub struct AvailabilityTool {
    client: Arc<BookingClient>,
}

impl AvailabilityTool {
    pub fn new(client: Arc<BookingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AvailabilityTool {
    fn name(&self) -> &str {
        "get_availability"
    }

    fn description(&self) -> &str {
        "Get the available slots for the given date range, services, and providers. \
         Returns a JSON array of {service_id, provider_id, day, start_time, end_time, \
         duration} objects, where duration is in minutes. Both id lists must be non-empty; \
         fetch them with get_services and get_providers first if needed."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "dateInit": {
                    "type": "string",
                    "description": "Start of the date range, format YYYY-MM-DDTHH:MM:SSZ"
                },
                "dateEnd": {
                    "type": "string",
                    "description": "End of the date range, format YYYY-MM-DDTHH:MM:SSZ"
                },
                "services": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": "Ids of the services to check, at least one"
                },
                "providers": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": "Ids of the providers to check, at least one"
                }
            },
            "required": ["dateInit", "dateEnd", "services", "providers"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let query = AvailabilityQuery {
            date_init: require_string(&params, "dateInit")?,
            date_end: require_string(&params, "dateEnd")?,
            services: require_id_list(&params, "services")?,
            providers: require_id_list(&params, "providers")?,
        };

        let slots = self.client.availability(&query).await?;
        debug!(slots = slots.len(), "fetched availability");
        Ok(serde_json::to_string(&slots)?)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
