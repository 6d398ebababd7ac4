//! Agent loop — the LLM ↔ tool-calling main loop.
//!
//! Takes a user message, builds context, calls the LLM, dispatches booking
//! tool calls, and returns the final text answer.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, info};

use clinicbot_booking::BookingClient;
use clinicbot_core::types::{Message, ToolCall};
use clinicbot_core::utils::truncate_string;
use clinicbot_providers::traits::{ChatProvider, ChatRequestConfig};

use crate::context::ContextBuilder;
use crate::tools::booking::{
    AvailabilityTool, CurrentDateTool, ListProvidersTool, ListServicesTool,
};
use crate::tools::registry::ToolRegistry;

/// Default maximum LLM ↔ tool iterations per user message.
const DEFAULT_MAX_ITERATIONS: usize = 10;

/// How many history messages to keep per conversation.
const HISTORY_LIMIT: usize = 50;

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// The main agent loop: calls the LLM and dispatches booking tools.
pub struct AgentLoop {
    /// LLM provider.
    provider: Arc<dyn ChatProvider>,
    /// Model to use (overrides provider default if set).
    model: String,
    /// Max LLM ↔ tool iterations per message.
    max_iterations: usize,
    /// LLM request config (temperature, max_tokens).
    request_config: ChatRequestConfig,
    /// Tool registry.
    tools: ToolRegistry,
    /// Context builder.
    context: ContextBuilder,
    /// Conversation history for this session.
    history: Mutex<Vec<Message>>,
}

impl AgentLoop {
    /// Create a new agent loop wired to a booking client.
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        booking: Arc<BookingClient>,
        model: Option<String>,
        max_iterations: Option<usize>,
        request_config: Option<ChatRequestConfig>,
    ) -> Self {
        let model = model.unwrap_or_else(|| provider.default_model().to_string());
        let max_iterations = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        let request_config = request_config.unwrap_or_default();

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CurrentDateTool));
        tools.register(Arc::new(ListServicesTool::new(booking.clone())));
        tools.register(Arc::new(ListProvidersTool::new(booking.clone())));
        tools.register(Arc::new(AvailabilityTool::new(booking)));

        info!(
            model = %model,
            tools = tools.len(),
            max_iterations = max_iterations,
            "agent loop initialized"
        );

        Self {
            provider,
            model,
            max_iterations,
            request_config,
            tools,
            context: ContextBuilder::new("Clinicbot"),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Process a single user message → final text answer.
    ///
    /// 1. Build context messages from history + user text
    /// 2. LLM ↔ tool loop
    /// 3. Save conversation to history, return the answer
    pub async fn process(&self, text: &str) -> Result<String> {
        let mut history = self.history.lock().await;
        let mut messages = self.context.build_messages(&history, text);
        let tool_defs = self.tools.get_definitions();

        let mut final_content: Option<String> = None;

        for iteration in 0..self.max_iterations {
            debug!(iteration = iteration, "LLM call");

            let response = self
                .provider
                .chat(&messages, Some(&tool_defs), &self.model, &self.request_config)
                .await;

            if response.has_tool_calls() {
                let tool_calls: Vec<ToolCall> = response.tool_calls.clone();
                ContextBuilder::add_assistant_message(
                    &mut messages,
                    response.content.clone(),
                    tool_calls.clone(),
                );

                for tc in &tool_calls {
                    let params: HashMap<String, serde_json::Value> =
                        serde_json::from_str(&tc.function.arguments).unwrap_or_default();

                    info!(
                        tool = %tc.function.name,
                        iteration = iteration,
                        "executing tool call"
                    );

                    let result = self.tools.execute(&tc.function.name, params).await;

                    debug!(
                        tool = %tc.function.name,
                        result = %truncate_string(&result, 200),
                        "tool result"
                    );

                    ContextBuilder::add_tool_result(&mut messages, &tc.id, &result);
                }
            } else {
                final_content = response.content;
                break;
            }
        }

        // If we exhausted iterations without a final answer
        let content = final_content
            .unwrap_or_else(|| "I've completed processing but have no response to give.".into());

        history.push(Message::user(text));
        history.push(Message::assistant(&content));
        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }

        Ok(content)
    }

    /// Clear the conversation history.
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Get a reference to the tool registry (for testing/extension).
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
