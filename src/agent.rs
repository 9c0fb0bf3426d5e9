use serde::{Deserialize, Serialize};

/// Routing label sent with each query so the backend picks the specialist
/// topic domain. Closed set; the wire names are the backend's Portuguese
/// identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentTag {
    #[serde(rename = "GERAL")]
    General,
    #[serde(rename = "CULTURA")]
    Culture,
    #[serde(rename = "SAUDE")]
    Health,
    #[serde(rename = "MOBILIDADE")]
    Mobility,
    #[serde(rename = "SERVICOS")]
    Services,
}

impl AgentTag {
    pub fn all() -> &'static [AgentTag] {
        &[
            AgentTag::General,
            AgentTag::Culture,
            AgentTag::Health,
            AgentTag::Mobility,
            AgentTag::Services,
        ]
    }

    /// Identifier used in the outbound `tipo_agente` field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AgentTag::General => "GERAL",
            AgentTag::Culture => "CULTURA",
            AgentTag::Health => "SAUDE",
            AgentTag::Mobility => "MOBILIDADE",
            AgentTag::Services => "SERVICOS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentTag::General => "Geral",
            AgentTag::Culture => "Cultura",
            AgentTag::Health => "Saúde",
            AgentTag::Mobility => "Mobilidade",
            AgentTag::Services => "Serviços",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentTag::General => "Perguntas gerais sobre a cidade do Recife",
            AgentTag::Culture => "Eventos, patrimônio histórico e manifestações culturais",
            AgentTag::Health => "Unidades de saúde, campanhas e serviços médicos",
            AgentTag::Mobility => "Transporte público, trânsito e ciclovias",
            AgentTag::Services => "Serviços municipais, documentos e tributos",
        }
    }

    /// Contextual hint shown in the input box for the active agent.
    pub fn placeholder(&self) -> &'static str {
        match self {
            AgentTag::General => "Pergunte algo sobre Recife...",
            AgentTag::Culture => "Pergunte algo sobre eventos culturais...",
            AgentTag::Health => "Pergunte algo sobre saúde pública...",
            AgentTag::Mobility => "Pergunte algo sobre mobilidade urbana...",
            AgentTag::Services => "Pergunte algo sobre serviços municipais...",
        }
    }

    pub fn from_str(s: &str) -> Option<AgentTag> {
        match s.to_uppercase().as_str() {
            "GERAL" => Some(AgentTag::General),
            "CULTURA" => Some(AgentTag::Culture),
            "SAUDE" => Some(AgentTag::Health),
            "MOBILIDADE" => Some(AgentTag::Mobility),
            "SERVICOS" => Some(AgentTag::Services),
            _ => None,
        }
    }
}

impl Default for AgentTag {
    fn default() -> Self {
        AgentTag::General
    }
}

/// Holds the single active agent tag. Selecting a tag only affects the next
/// outbound request; past and in-flight requests keep the tag they were
/// dispatched with.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentSelector {
    active: AgentTag,
}

impl AgentSelector {
    pub fn new(initial: AgentTag) -> Self {
        Self { active: initial }
    }

    pub fn select(&mut self, tag: AgentTag) {
        self.active = tag;
    }

    pub fn current(&self) -> AgentTag {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_general() {
        assert_eq!(AgentSelector::default().current(), AgentTag::General);
    }

    #[test]
    fn test_select_replaces_active_tag() {
        let mut selector = AgentSelector::default();
        selector.select(AgentTag::Mobility);
        assert_eq!(selector.current(), AgentTag::Mobility);
        selector.select(AgentTag::Culture);
        assert_eq!(selector.current(), AgentTag::Culture);
    }

    #[test]
    fn test_wire_names_round_trip() {
        for &tag in AgentTag::all() {
            assert_eq!(AgentTag::from_str(tag.wire_name()), Some(tag));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(AgentTag::from_str("mobilidade"), Some(AgentTag::Mobility));
        assert_eq!(AgentTag::from_str("desconhecido"), None);
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&AgentTag::Health).unwrap();
        assert_eq!(json, "\"SAUDE\"");
    }
}
