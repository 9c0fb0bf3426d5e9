use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::agent::AgentTag;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Outbound payload for the backend's `/message` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
    pub tipo_agente: AgentTag,
}

/// Backend answer. Only `answer` is required; the remaining fields are
/// advisory and tolerated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub is_data_query: Option<bool>,
    #[serde(default)]
    pub agent_type: Option<String>,
}

/// Network boundary between the query controller and the backend. The
/// controller treats any error uniformly; callers in tests substitute a
/// recording fake.
pub trait Transport {
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse>> + Send;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/message", self.base_url);

        tracing::debug!(
            conversation_id = %request.conversation_id,
            agent = request.tipo_agente.wire_name(),
            "sending message to backend"
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "backend request failed with status: {}",
                response.status()
            ));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response)
    }
}

impl Transport for BackendClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        BackendClient::send(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_fields() {
        let request = ChatRequest {
            message: "Oi".to_string(),
            conversation_id: "conv_1".to_string(),
            tipo_agente: AgentTag::Mobility,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["message"], "Oi");
        assert_eq!(value["conversation_id"], "conv_1");
        assert_eq!(value["tipo_agente"], "MOBILIDADE");
    }

    #[test]
    fn test_response_parses_with_only_answer() {
        let response: ChatResponse = serde_json::from_str(r#"{"answer":"Resposta"}"#).unwrap();
        assert_eq!(response.answer, "Resposta");
        assert!(response.conversation_id.is_none());
        assert!(response.is_data_query.is_none());
    }

    #[test]
    fn test_response_parses_extra_fields() {
        let body = r#"{
            "answer": "Resposta",
            "conversation_id": "conv_2",
            "is_data_query": true,
            "agent_type": "SAUDE"
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.conversation_id.as_deref(), Some("conv_2"));
        assert_eq!(response.is_data_query, Some(true));
        assert_eq!(response.agent_type.as_deref(), Some("SAUDE"));
    }

    #[test]
    fn test_response_without_answer_is_malformed() {
        let result: std::result::Result<ChatResponse, _> =
            serde_json::from_str(r#"{"conversation_id":"conv_3"}"#);
        assert!(result.is_err());

        let wrong_type: std::result::Result<ChatResponse, _> =
            serde_json::from_str(r#"{"answer": 42}"#);
        assert!(wrong_type.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://example.com/api/");
        assert_eq!(client.base_url(), "http://example.com/api");
    }
}
