use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::agent::AgentTag;
use crate::client::DEFAULT_BACKEND_URL;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub default_agent: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Persist the picked agent so the next session starts on it.
    pub fn save_default_agent(tag: AgentTag) -> Result<()> {
        Self::save_default_agent_to(tag, &Self::config_path()?)
    }

    fn save_default_agent_to(tag: AgentTag, path: &Path) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|_| Self::new());
        config.default_agent = Some(tag.wire_name().to_string());
        config.save_to(path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Effective backend URL: explicit flag wins, then the `BACKEND_API_URL`
    /// environment variable, then the config file, then the built-in default.
    pub fn resolve_backend_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| std::env::var("BACKEND_API_URL").ok())
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// Effective initial agent, falling back to GERAL on anything unknown.
    pub fn resolve_agent(&self, flag: Option<&str>) -> AgentTag {
        flag.or(self.default_agent.as_deref())
            .and_then(AgentTag::from_str)
            .unwrap_or_default()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("recife-chat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.backend_url.is_none());
        assert!(config.default_agent.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            backend_url: Some("http://10.0.0.5:8000".to_string()),
            default_agent: Some("CULTURA".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(loaded.default_agent.as_deref(), Some("CULTURA"));
    }

    #[test]
    fn test_save_default_agent_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            backend_url: Some("http://10.0.0.5:8000".to_string()),
            default_agent: None,
        };
        config.save_to(&path).unwrap();

        Config::save_default_agent_to(AgentTag::Culture, &path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(loaded.default_agent.as_deref(), Some("CULTURA"));
    }

    #[test]
    fn test_flag_overrides_file_backend_url() {
        let config = Config {
            backend_url: Some("http://file:8000".to_string()),
            default_agent: None,
        };
        assert_eq!(
            config.resolve_backend_url(Some("http://flag:8000")),
            "http://flag:8000"
        );
    }

    #[test]
    fn test_agent_resolution_falls_back_to_general() {
        let config = Config {
            backend_url: None,
            default_agent: Some("MOBILIDADE".to_string()),
        };
        assert_eq!(config.resolve_agent(None), AgentTag::Mobility);
        assert_eq!(config.resolve_agent(Some("SAUDE")), AgentTag::Health);

        let broken = Config {
            backend_url: None,
            default_agent: Some("INVALIDO".to_string()),
        };
        assert_eq!(broken.resolve_agent(None), AgentTag::General);
    }
}
