use std::time::{SystemTime, UNIX_EPOCH};

/// Greeting seeded as the first assistant message of every session.
pub const GREETING: &str = "Olá! Sou a Ana, assistente virtual do Recife. \
Como posso ajudar você a encontrar informações sobre a cidade?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Ordered message history for one session plus the in-flight flag.
///
/// The history is a write-once log: messages are only ever appended, never
/// mutated or removed. The id is generated once and stays stable so the
/// backend can correlate multi-turn context.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    messages: Vec<Message>,
    pending: bool,
}

impl Conversation {
    /// New conversation with the assistant greeting already present.
    pub fn new() -> Self {
        Self::with_id(generate_conversation_id())
    }

    pub fn with_id(id: String) -> Self {
        Self {
            id,
            messages: vec![Message::assistant(GREETING)],
            pending: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque session token: fixed prefix plus creation timestamp. No consumer
/// parses its structure.
fn generate_conversation_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("conv_{millis}")
}
