//! Generic HTTP provider for OpenAI-compatible `/chat/completions` APIs.
//!
//! Covers OpenAI, OpenRouter, and Groq — anything speaking the chat
//! completions dialect with Bearer auth.

use async_trait::async_trait;
use tracing::{debug, error};

use clinicbot_core::config::{Config, ProviderConfig};
use clinicbot_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolDefinition,
};

use crate::traits::{ChatProvider, ChatRequestConfig};

/// Default API base per known provider name.
fn default_api_base(name: &str) -> Option<&'static str> {
    match name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        _ => None,
    }
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// An LLM provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://openrouter.ai/api/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    /// Human-readable name for logs.
    name: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .field("provider", &self.name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from a named config entry and a default model.
    pub fn new(name: &str, config: &ProviderConfig, model: &str) -> Self {
        // Resolve API base: config > known default > standard OpenAI path
        let api_base = config
            .api_base
            .clone()
            .or_else(|| default_api_base(name).map(String::from))
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
            name: name.to_string(),
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl ChatProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &ChatRequestConfig,
    ) -> LlmResponse {
        debug!(
            provider = %self.name,
            model = %model,
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| "auto".to_string()),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let result = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await;

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                error!(provider = %self.name, error = %e, "HTTP request failed");
                return LlmResponse::error(format!("Error calling LLM: {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = %self.name,
                status = %status,
                body = %error_text,
                "API error"
            );
            return LlmResponse::error(format!("Error calling LLM: {} — {}", status, error_text));
        }

        match response.json::<ChatCompletionResponse>().await {
            Ok(chat_resp) => {
                let llm_resp: LlmResponse = chat_resp.into();
                debug!(
                    provider = %self.name,
                    has_content = llm_resp.content.is_some(),
                    tool_calls = llm_resp.tool_calls.len(),
                    finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
                    "LLM response received"
                );
                llm_resp
            }
            Err(e) => {
                error!(provider = %self.name, error = %e, "Failed to parse LLM response");
                LlmResponse::error(format!("Error parsing LLM response: {}", e))
            }
        }
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an HttpProvider from the loaded config.
///
/// Uses `agent.provider` to pick the provider entry and `agent.model` as
/// the default model. The selected provider must have an API key set.
pub fn create_provider(config: &Config) -> Result<HttpProvider, String> {
    let name = &config.agent.provider;
    let provider_config = config
        .providers
        .get_by_name(name)
        .ok_or_else(|| format!("Unknown provider '{}' (expected openai, openrouter, or groq)", name))?;

    if !provider_config.is_configured() {
        return Err(format!(
            "Provider '{}' has no API key. Set CLINICBOT_PROVIDERS__{}__API_KEY or edit the config file.",
            name,
            name.to_uppercase()
        ));
    }

    debug!(
        provider = %name,
        model = %config.agent.model,
        api_base = provider_config.api_base.as_deref().unwrap_or("default"),
        "Creating LLM provider"
    );

    Ok(HttpProvider::new(name, provider_config, &config.agent.model))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
