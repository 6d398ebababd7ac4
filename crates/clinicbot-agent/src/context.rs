//! Context builder — constructs the system prompt and conversation messages.
//!
//! The system prompt encodes the clinic receptionist persona and the rules
//! the assistant must follow when calling the booking tools.

use clinicbot_core::types::{Message, ToolCall};

// ─────────────────────────────────────────────
// System prompt
// ─────────────────────────────────────────────

/// Core instructions for the clinic booking assistant.
const AGENT_INSTRUCTIONS: &str = "\
You are a friendly receptionist for a clinic. You help users find available \
appointment slots for the clinic's services.

Rules:
- Service ids and provider ids are internal. NEVER reveal an id to the user; \
always refer to services and providers by name.
- To check availability you need a date range, service ids, and provider ids. \
Use get_services and get_providers to translate names the user mentions into ids.
- If the user does not name a service or provider, check every service with \
every provider that performs it.
- If the user gives no start date, use the current date (call get_current_date).
- If the user gives no end date, use three months after the current date.
- If the user asks for a specific start time, fetch the availabilities, show \
only the slots that begin at that time, and apologize if there are none.
- Dates passed to get_availability use the format YYYY-MM-DDTHH:MM:SSZ.
- When a tool reports an error, tell the user the booking system is \
unavailable right now. Do not pretend the calendar is empty.

Present each available slot on its own line:
Service: <service name>, Provider: <provider name>, Day: <day>, \
Start: <start time>, End: <end time>, Duration: <minutes> minutes.";

// ─────────────────────────────────────────────
// Context builder
// ─────────────────────────────────────────────

/// Builds system prompts and conversation message lists for the agent loop.
pub struct ContextBuilder {
    /// Assistant identity name (for the system prompt).
    agent_name: String,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
        }
    }

    /// Build the full system prompt.
    pub fn build_system_prompt(&self) -> String {
        format!(
            "# Identity\n\nYou are **{name}**, a clinic booking assistant.\n\n{instructions}",
            name = self.agent_name,
            instructions = AGENT_INSTRUCTIONS,
        )
    }

    /// Build the full message list for an LLM call.
    ///
    /// 1. System prompt
    /// 2. Conversation history
    /// 3. Current user message
    pub fn build_messages(&self, history: &[Message], user_text: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.build_system_prompt()));
        messages.extend_from_slice(history);
        messages.push(Message::user(user_text));
        messages
    }

    /// Add a tool result to the message list (convenience wrapper).
    pub fn add_tool_result(messages: &mut Vec<Message>, tool_call_id: &str, result: &str) {
        messages.push(Message::tool_result(tool_call_id, result));
    }

    /// Add an assistant message (with optional tool calls) to the message list.
    pub fn add_assistant_message(
        messages: &mut Vec<Message>,
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) {
        if tool_calls.is_empty() {
            if let Some(text) = content {
                messages.push(Message::assistant(text));
            }
        } else {
            messages.push(Message::assistant_tool_calls(tool_calls));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_system_prompt() {
        let ctx = ContextBuilder::new("Clinicbot");
        let prompt = ctx.build_system_prompt();
        assert!(prompt.contains("Clinicbot"));
        assert!(prompt.contains("NEVER reveal an id"));
        assert!(prompt.contains("three months after the current date"));
        assert!(prompt.contains("begin at that time"));
    }

    #[test]
    fn test_build_messages_order() {
        let ctx = ContextBuilder::new("Clinicbot");
        let history = vec![
            Message::user("previous question"),
            Message::assistant("previous answer"),
        ];
        let msgs = ctx.build_messages(&history, "new question");
        // system + 2 history + 1 user = 4
        assert_eq!(msgs.len(), 4);
        assert!(matches!(msgs[0], Message::System { .. }));
        assert!(matches!(msgs[3], Message::User { .. }));
    }

    #[test]
    fn test_add_tool_result() {
        let mut msgs = vec![Message::user("test")];
        ContextBuilder::add_tool_result(&mut msgs, "call_1", "result data");
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn test_add_assistant_message_text() {
        let mut msgs = Vec::new();
        ContextBuilder::add_assistant_message(&mut msgs, Some("hello".into()), vec![]);
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0], Message::Assistant { .. }));
    }

    #[test]
    fn test_add_assistant_message_tool_calls() {
        let mut msgs = Vec::new();
        let tc = ToolCall::new("id1", "get_services", "{}");
        ContextBuilder::add_assistant_message(&mut msgs, None, vec![tc]);
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn test_add_assistant_message_empty() {
        let mut msgs = Vec::new();
        ContextBuilder::add_assistant_message(&mut msgs, None, vec![]);
        assert!(msgs.is_empty());
    }
}
