use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::ConversationConfig;
use crate::errors::{Phase, ThinkError, ThinkResult};
use crate::executor::ToolExecutor;
use crate::prompt::compose;
use crate::providers::base::ApiClient;
use crate::providers::types::content::ContentBlock;
use crate::providers::types::message::{Message, MessagesRequest, ModelResponse};
use crate::providers::utils::{count_tool_uses, decode_response, extract_text, first_tool_use};
use crate::tool::think_tool;

/// Stand-in deadline for timeouts too large to represent as an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Outcome of a run: the last payload received and the text it carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub raw: Value,
    pub text: String,
}

impl From<ModelResponse> for NormalizedResult {
    fn from(response: ModelResponse) -> Self {
        Self {
            text: extract_text(&response.content),
            raw: response.raw,
        }
    }
}

/// Drives the two-turn `think` conversation.
///
/// A run sends the prompt with the tool advertised. If the model stops for
/// anything but a tool use, that reply is the result. Otherwise the first tool
/// use is answered through the [`ToolExecutor`] and a single follow-up turn is
/// sent; its reply is the result. Nothing is retried and every failure ends the
/// run. The orchestrator holds no run state, so one instance can serve
/// concurrent runs.
pub struct Orchestrator<'a> {
    client: &'a dyn ApiClient,
    executor: &'a dyn ToolExecutor,
}

impl<'a> Orchestrator<'a> {
    pub fn new(client: &'a dyn ApiClient, executor: &'a dyn ToolExecutor) -> Self {
        Self { client, executor }
    }

    /// Run with a deadline of `config.timeout` from now.
    pub fn run(&self, thought: &str, config: &ConversationConfig) -> ThinkResult<NormalizedResult> {
        let now = Instant::now();
        let deadline = now
            .checked_add(config.timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.run_until(thought, config, deadline)
    }

    /// Run with an explicit deadline shared by both turns.
    pub fn run_until(
        &self,
        thought: &str,
        config: &ConversationConfig,
        deadline: Instant,
    ) -> ThinkResult<NormalizedResult> {
        let prompt = compose(thought, config.prompt_template.as_deref());
        let initial = MessagesRequest {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            messages: vec![Message::user(prompt)],
            tools: vec![think_tool()],
        };

        debug!(model = %config.model, "sending initial request");
        let response = self.exchange(Phase::Initial, &initial, deadline)?;

        if !response.wants_tool() {
            debug!(stop_reason = %response.stop_reason, "model answered without the tool");
            return Ok(response.into());
        }

        let tool_use = first_tool_use(&response.content)
            .filter(|tool_use| tool_use.is_valid())
            .ok_or_else(|| ThinkError::protocol(Phase::Initial, "no valid tool-use block"))?;

        let ignored = count_tool_uses(&response.content) - 1;
        if ignored > 0 {
            warn!(ignored, "response requested several tool uses, answering the first");
        }
        debug!(id = %tool_use.id, name = %tool_use.name, "found tool use");

        let output = self
            .executor
            .execute(&tool_use.name, thought)
            .map_err(|e| {
                let reason = format!("tool '{}' failed: {:#}", tool_use.name, e);
                ThinkError::protocol(Phase::Initial, reason)
            })?;

        let follow_up = follow_up_request(initial, &response, &tool_use.id, output);

        debug!("sending follow-up request with tool result");
        let response = self.exchange(Phase::FollowUp, &follow_up, deadline)?;
        debug!(stop_reason = %response.stop_reason, "tool use cycle complete");

        Ok(response.into())
    }

    fn exchange(
        &self,
        phase: Phase,
        request: &MessagesRequest,
        deadline: Instant,
    ) -> ThinkResult<ModelResponse> {
        let bytes = self
            .client
            .send_request(request, deadline)
            .map_err(|e| ThinkError::from_client(phase, e))?;

        let response = decode_response(&bytes)
            .map_err(|e| ThinkError::protocol(phase, format!("failed to parse response: {}", e)))?;

        debug!(
            %phase,
            stop_reason = %response.stop_reason,
            blocks = ?response.content.iter().map(ContentBlock::kind).collect::<Vec<_>>(),
            "received response"
        );
        Ok(response)
    }
}

/// The initial request extended with the assistant's turn, replayed verbatim, and
/// a user turn holding the tool result.
fn follow_up_request(
    initial: MessagesRequest,
    response: &ModelResponse,
    tool_use_id: &str,
    output: String,
) -> MessagesRequest {
    let mut messages = initial.messages;
    messages.push(Message::assistant_raw(response.raw_content()));
    messages.push(Message::tool_result(tool_use_id, output));

    MessagesRequest { messages, ..initial }
}
