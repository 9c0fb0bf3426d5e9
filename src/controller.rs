use anyhow::Result;

use crate::agent::{AgentSelector, AgentTag};
use crate::client::{ChatRequest, ChatResponse, Transport};
use crate::conversation::{Conversation, Message};

/// Reply appended in place of any failed or malformed backend response. The
/// underlying cause is logged, never shown to the user.
pub const FALLBACK_REPLY: &str = "Desculpe, estou tendo dificuldades para \
processar sua solicitação no momento. Por favor, tente novamente mais tarde.";

/// Owns the conversation and agent state and drives the request lifecycle.
///
/// The lifecycle is an explicit dispatch/resolve pair: `dispatch` checks the
/// preconditions (non-blank input, nothing in flight), appends the user
/// message and produces the outbound payload; `resolve` finalizes with the
/// transport outcome. Exactly one request is in flight at any time, and the
/// pending flag is cleared on every resolve path.
pub struct QueryController {
    conversation: Conversation,
    agents: AgentSelector,
}

impl QueryController {
    pub fn new(initial_agent: AgentTag) -> Self {
        Self {
            conversation: Conversation::new(),
            agents: AgentSelector::new(initial_agent),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn select_agent(&mut self, tag: AgentTag) {
        self.agents.select(tag);
    }

    pub fn current_agent(&self) -> AgentTag {
        self.agents.current()
    }

    pub fn is_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    /// Begin a query. Returns the payload to hand to the transport, or None
    /// when the input is blank or a request is already in flight (a silent
    /// no-op: no queueing, no cancellation).
    pub fn dispatch(&mut self, input: &str) -> Option<ChatRequest> {
        let trimmed = input.trim();
        if trimmed.is_empty() || self.conversation.is_pending() {
            return None;
        }

        self.conversation.append(Message::user(trimmed));
        self.conversation.set_pending(true);

        Some(ChatRequest {
            message: trimmed.to_string(),
            conversation_id: self.conversation.id().to_string(),
            tipo_agente: self.agents.current(),
        })
    }

    /// Finish the in-flight query. A successful response appends the answer
    /// verbatim; any failure is absorbed into the fixed fallback reply. The
    /// pending flag is cleared on both paths.
    pub fn resolve(&mut self, result: Result<ChatResponse>) {
        match result {
            Ok(response) => {
                self.conversation.append(Message::assistant(response.answer));
            }
            Err(error) => {
                tracing::warn!(%error, "query failed, replying with fallback");
                self.conversation.append(Message::assistant(FALLBACK_REPLY));
            }
        }
        self.conversation.set_pending(false);
    }

    /// Full submit: dispatch, await the transport, resolve. Returns false on
    /// the silent no-op path.
    pub async fn submit<T: Transport>(&mut self, input: &str, transport: &T) -> bool {
        let Some(request) = self.dispatch(input) else {
            return false;
        };
        let result = transport.send(&request).await;
        self.resolve(result);
        true
    }
}
