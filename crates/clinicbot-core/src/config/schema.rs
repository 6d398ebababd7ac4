//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ProvidersConfig`, `BookingConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! `#[serde(rename_all = "camelCase")]` handles the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.clinicbot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub providers: ProvidersConfig,
    pub booking: BookingConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Agent settings: which LLM to use and how hard it may loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Which provider entry to use (e.g. `"openrouter"`).
    pub provider: String,
    /// LLM model identifier.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tool-calling loop iterations before forcing a response.
    pub max_tool_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "anthropic/claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_tool_iterations: 10,
        }
    }
}

// ─────────────────────────────────────────────
// LLM providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by name (e.g. `"openrouter"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "openrouter" => Some(&self.openrouter),
            "groq" => Some(&self.groq),
            _ => None,
        }
    }

    /// Name → config map, for iteration in status displays.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        let mut map = HashMap::new();
        map.insert("openai".to_string(), self.openai.clone());
        map.insert("openrouter".to_string(), self.openrouter.clone());
        map.insert("groq".to_string(), self.groq.clone());
        map
    }
}

// ─────────────────────────────────────────────
// Booking API
// ─────────────────────────────────────────────

/// How the availability aggregator queries the booking API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStrategy {
    /// One POST carrying all service and provider ids (canonical).
    #[default]
    #[serde(rename = "batch")]
    Batch,
    /// One POST per (service, provider) pair, sequential, fail-fast.
    /// Compatibility mode matching the legacy per-pair behavior.
    #[serde(rename = "perPair")]
    PerPair,
}

/// Connection settings for the remote booking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingConfig {
    /// Base URL of the booking API.
    pub api_base: String,
    /// Store slug, appears twice in every endpoint path.
    pub store: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Aggregation strategy for availability queries.
    pub availability_strategy: AvailabilityStrategy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.doc.pt".to_string(),
            store: "doc".to_string(),
            timeout_secs: 30,
            availability_strategy: AvailabilityStrategy::Batch,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
