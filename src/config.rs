//! Carga y gestión de configuración de la aplicación (servidor, recuperación y LLM).

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Gemini,
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!("Proveedor LLM no soportado: {other}")),
        }
    }
}

/// Cómo se generan las respuestas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Plantilla determinista, sin llamadas externas.
    #[default]
    Template,
    /// Prompt personalizado enviado al LLM configurado.
    Llm,
}

impl GenerationMode {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "llm" => Ok(Self::Llm),
            other => Err(anyhow!("Modo de generación no soportado: {other}")),
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,

    pub generation_mode: GenerationMode,
    pub llm_provider: LlmProvider,
    pub llm_chat_model: String,
    pub openai_api_key: Option<String>,

    pub top_k: usize,
    pub snippet_chars: usize,
    pub seed_sample_documents: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:3322".to_string(),
            generation_mode: GenerationMode::Template,
            llm_provider: LlmProvider::OpenAI,
            llm_chat_model: "gpt-4o-mini".to_string(),
            openai_api_key: None,
            top_k: 3,
            snippet_chars: 120,
            seed_sample_documents: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, pero leyendo de una función arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_addr = lookup("SERVER_ADDR").unwrap_or(defaults.server_addr);

        let generation_mode = match lookup("GENERATION_MODE") {
            Some(mode) => GenerationMode::from_str(&mode)?,
            None => defaults.generation_mode,
        };

        let llm_provider = match lookup("LLM_PROVIDER") {
            Some(provider) => LlmProvider::from_str(&provider)?,
            None => defaults.llm_provider,
        };

        let llm_chat_model = lookup("LLM_CHAT_MODEL").unwrap_or(defaults.llm_chat_model);
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());

        let top_k = parse_positive(&lookup, "RETRIEVAL_TOP_K", defaults.top_k)?;
        let snippet_chars = parse_positive(&lookup, "SNIPPET_CHARS", defaults.snippet_chars)?;

        let seed_sample_documents = match lookup("SEED_SAMPLE_DOCUMENTS") {
            Some(raw) => bool::from_str(raw.trim().to_lowercase().as_str())
                .map_err(|_| anyhow!("SEED_SAMPLE_DOCUMENTS debe ser true o false, no '{raw}'"))?,
            None => defaults.seed_sample_documents,
        };

        Ok(Self {
            server_addr,
            generation_mode,
            llm_provider,
            llm_chat_model,
            openai_api_key,
            top_k,
            snippet_chars,
            seed_sample_documents,
        })
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(anyhow!("{key} debe ser mayor que 0")),
        Ok(value) => Ok(value),
        Err(_) => Err(anyhow!("{key} no es un número válido: '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_use_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:3322");
        assert_eq!(cfg.generation_mode, GenerationMode::Template);
        assert_eq!(cfg.top_k, 3);
        assert!(cfg.seed_sample_documents);
        assert!(cfg.openai_api_key.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(cfg.openai_api_key.is_none());

        let cfg = AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn variables_override_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("GENERATION_MODE", "LLM"),
            ("LLM_PROVIDER", "ollama"),
            ("RETRIEVAL_TOP_K", "5"),
            ("SNIPPET_CHARS", "40"),
            ("SEED_SAMPLE_DOCUMENTS", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.generation_mode, GenerationMode::Llm);
        assert_eq!(cfg.llm_provider, LlmProvider::Ollama);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.snippet_chars, 40);
        assert!(!cfg.seed_sample_documents);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("RETRIEVAL_TOP_K", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("SNIPPET_CHARS", "many")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("GENERATION_MODE", "magic")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "acme")])).is_err());
    }
}
