//! Config loader — reads `~/.clinicbot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.clinicbot/config.json`
//! 3. Environment variables `CLINICBOT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{AvailabilityStrategy, Config};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `CLINICBOT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `CLINICBOT_AGENT__PROVIDER` → `agent.provider`
/// - `CLINICBOT_AGENT__MODEL` → `agent.model`
/// - `CLINICBOT_AGENT__MAX_TOKENS` → `agent.max_tokens`
/// - `CLINICBOT_AGENT__TEMPERATURE` → `agent.temperature`
/// - `CLINICBOT_AGENT__MAX_TOOL_ITERATIONS` → `agent.max_tool_iterations`
/// - `CLINICBOT_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `CLINICBOT_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `CLINICBOT_BOOKING__API_BASE` → `booking.api_base`
/// - `CLINICBOT_BOOKING__STORE` → `booking.store`
/// - `CLINICBOT_BOOKING__TIMEOUT_SECS` → `booking.timeout_secs`
/// - `CLINICBOT_BOOKING__AVAILABILITY_STRATEGY` → `booking.availability_strategy`
///   (`batch` or `perPair`)
fn apply_env_overrides(mut config: Config) -> Config {
    // Agent
    if let Ok(val) = std::env::var("CLINICBOT_AGENT__PROVIDER") {
        config.agent.provider = val;
    }
    if let Ok(val) = std::env::var("CLINICBOT_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Ok(val) = std::env::var("CLINICBOT_AGENT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("CLINICBOT_AGENT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.agent.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("CLINICBOT_AGENT__MAX_TOOL_ITERATIONS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tool_iterations = n;
        }
    }

    // Provider API keys (by provider name)
    apply_provider_env(&mut config.providers.openai, "OPENAI");
    apply_provider_env(&mut config.providers.openrouter, "OPENROUTER");
    apply_provider_env(&mut config.providers.groq, "GROQ");

    // Booking API
    if let Ok(val) = std::env::var("CLINICBOT_BOOKING__API_BASE") {
        config.booking.api_base = val;
    }
    if let Ok(val) = std::env::var("CLINICBOT_BOOKING__STORE") {
        config.booking.store = val;
    }
    if let Ok(val) = std::env::var("CLINICBOT_BOOKING__TIMEOUT_SECS") {
        if let Ok(secs) = val.parse::<u64>() {
            config.booking.timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("CLINICBOT_BOOKING__AVAILABILITY_STRATEGY") {
        match val.as_str() {
            "batch" => config.booking.availability_strategy = AvailabilityStrategy::Batch,
            "perPair" => config.booking.availability_strategy = AvailabilityStrategy::PerPair,
            other => warn!("Unknown availability strategy '{}', keeping current", other),
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut super::schema::ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("CLINICBOT_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("CLINICBOT_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
