//! Abstracción sobre Rig para el colaborador de generación real.
//! De momento se implementa OpenAI; Gemini/Ollama quedan preparados para el futuro.

use crate::config::{AppConfig, LlmProvider};
use anyhow::{anyhow, Result};
use rig::completion::Prompt;
use tracing::debug;

const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = r#"
You are a personalized knowledge assistant.
Only use the information supplied in the context.
If the context does not contain the answer, say explicitly that you do not know.
"#;

/// Gestor del LLM de chat.
#[derive(Clone)]
pub struct LlmManager {
    pub provider: LlmProvider,
    pub chat_model: String,
    pub api_key: Option<String>,
}

// La API key no debe aparecer en logs.
impl std::fmt::Debug for LlmManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmManager")
            .field("provider", &self.provider)
            .field("chat_model", &self.chat_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl LlmManager {
    /// Construye el manager a partir de la configuración. Falla si el
    /// proveedor no está implementado o si falta su API key.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        match cfg.llm_provider {
            LlmProvider::OpenAI => {
                if cfg.openai_api_key.is_none() {
                    return Err(anyhow!(
                        "Falta OPENAI_API_KEY en el entorno (necesaria con GENERATION_MODE=llm)"
                    ));
                }
            }
            ref other => {
                return Err(anyhow!(
                    "Proveedor LLM {:?} aún no implementado para chat; usa LLM_PROVIDER=openai o GENERATION_MODE=template",
                    other
                ));
            }
        }

        Ok(Self {
            provider: cfg.llm_provider.clone(),
            chat_model: cfg.llm_chat_model.clone(),
            api_key: cfg.openai_api_key.clone(),
        })
    }

    fn model_name(&self) -> &str {
        if self.chat_model.is_empty() {
            DEFAULT_CHAT_MODEL
        } else {
            self.chat_model.as_str()
        }
    }

    /// Genera una respuesta para un prompt ya personalizado.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAI => self.generate_with_openai(prompt).await,
            ref other => Err(anyhow!(
                "Proveedor LLM {:?} aún no implementado para chat",
                other
            )),
        }
    }

    async fn generate_with_openai(&self, prompt: &str) -> Result<String> {
        use rig::providers::openai;
        // Trait para client.agent(...)
        use rig::client::CompletionClient as _;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY no configurada"))?;

        let client = openai::Client::new(api_key);
        debug!("Enviando prompt a OpenAI ({}).", self.model_name());

        let agent = client
            .agent(self.model_name())
            .preamble(SYSTEM_PROMPT)
            .build();

        let answer = agent.prompt(prompt).await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationMode;

    fn llm_config(provider: LlmProvider, api_key: Option<&str>) -> AppConfig {
        AppConfig {
            generation_mode: GenerationMode::Llm,
            llm_provider: provider,
            openai_api_key: api_key.map(str::to_string),
            ..AppConfig::default()
        }
    }

    #[test]
    fn empty_chat_model_falls_back_to_default() {
        let manager = LlmManager {
            provider: LlmProvider::OpenAI,
            chat_model: String::new(),
            api_key: None,
        };
        assert_eq!(manager.model_name(), DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn unsupported_provider_fails_without_network() {
        let manager = LlmManager {
            provider: LlmProvider::Ollama,
            chat_model: "llama3".to_string(),
            api_key: None,
        };
        let err = tokio_test::block_on(manager.generate("hola")).unwrap_err();
        assert!(err.to_string().contains("Ollama"));
    }

    #[test]
    fn openai_without_api_key_is_rejected_at_startup() {
        let err = LlmManager::from_config(&llm_config(LlmProvider::OpenAI, None)).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn unimplemented_providers_are_rejected_at_startup() {
        for provider in [LlmProvider::Gemini, LlmProvider::Ollama] {
            let err = LlmManager::from_config(&llm_config(provider, Some("sk-test"))).unwrap_err();
            assert!(err.to_string().contains("aún no implementado"));
        }
    }

    #[test]
    fn openai_with_api_key_builds_the_manager() {
        let manager =
            LlmManager::from_config(&llm_config(LlmProvider::OpenAI, Some("sk-test"))).unwrap();
        assert_eq!(manager.api_key.as_deref(), Some("sk-test"));
        assert!(!format!("{manager:?}").contains("sk-test"));
    }

    #[test]
    fn missing_api_key_at_generation_is_an_error_not_a_panic() {
        let manager = LlmManager {
            provider: LlmProvider::OpenAI,
            chat_model: String::new(),
            api_key: None,
        };
        let err = tokio_test::block_on(manager.generate("hola")).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
