//! Síntesis de respuestas personalizadas.
//!
//! La ruta por defecto es una plantilla determinista (preámbulo según estilo,
//! resumen con fragmentos de los documentos y cierre). La ruta LLM envía el
//! prompt de `query_adapter::build_prompt` al colaborador de generación.

use anyhow::Result as AnyResult;
use tracing::debug;

use crate::config::{AppConfig, GenerationMode};
use crate::error::{AssistantError, Result};
use crate::llm::LlmManager;
use crate::models::{Document, ResponseStyle, UserProfile};
use crate::query_adapter;

pub const NO_RELEVANT_INFORMATION: &str =
    "No relevant information was found in the knowledge base to answer this question.";

pub const DEFAULT_SNIPPET_CHARS: usize = 120;

pub fn preamble(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Professional => "Here is a structured overview based on the knowledge base.",
        ResponseStyle::Casual => "Hey! Here's what I dug up for you.",
        ResponseStyle::Technical => "Technical summary of the indexed sources:",
        ResponseStyle::Creative => "Picture the knowledge base as a library; this is what it lent us.",
    }
}

pub fn closing(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Professional => "Please let me know if you need further detail on any point.",
        ResponseStyle::Casual => "Hope that helps, just ask if you want more!",
        ResponseStyle::Technical => "Consult the cited sources for implementation specifics.",
        ResponseStyle::Creative => "Every answer is a door to the next question.",
    }
}

/// Primeros `max_chars` caracteres del texto, con "..." si se ha cortado.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Respuesta por plantilla con la longitud de fragmento por defecto.
pub fn synthesize(question: &str, documents: &[Document], profile: &UserProfile) -> String {
    synthesize_with_snippet_len(question, documents, profile, DEFAULT_SNIPPET_CHARS)
}

pub fn synthesize_with_snippet_len(
    question: &str,
    documents: &[Document],
    profile: &UserProfile,
    snippet_chars: usize,
) -> String {
    if documents.is_empty() {
        return NO_RELEVANT_INFORMATION.to_string();
    }

    let snippets: Vec<String> = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[{}] {}", i + 1, snippet(&doc.text, snippet_chars)))
        .collect();

    format!(
        "{preamble}\n\
         Based on your {level} level and {style} preference, here is what the sources say about '{question}':\n\
         {summary}\n\
         {closing}",
        preamble = preamble(profile.response_style),
        level = profile.expertise_level,
        style = profile.response_style,
        summary = snippets.join("\n"),
        closing = closing(profile.response_style),
    )
}

/// Capacidad de generación seleccionada por configuración.
#[derive(Debug, Clone)]
pub enum Generator {
    Template { snippet_chars: usize },
    Llm(LlmManager),
}

impl Default for Generator {
    fn default() -> Self {
        Self::Template {
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

impl Generator {
    pub fn from_config(cfg: &AppConfig) -> AnyResult<Self> {
        Ok(match cfg.generation_mode {
            GenerationMode::Template => Self::Template {
                snippet_chars: cfg.snippet_chars,
            },
            GenerationMode::Llm => Self::Llm(LlmManager::from_config(cfg)?),
        })
    }

    /// Sin documentos nunca se llama al LLM: se devuelve el mensaje fijo.
    pub async fn respond(
        &self,
        question: &str,
        documents: &[Document],
        profile: &UserProfile,
    ) -> Result<String> {
        if documents.is_empty() {
            return Ok(NO_RELEVANT_INFORMATION.to_string());
        }

        match self {
            Self::Template { snippet_chars } => Ok(synthesize_with_snippet_len(
                question,
                documents,
                profile,
                *snippet_chars,
            )),
            Self::Llm(llm) => {
                let context: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
                let prompt = query_adapter::build_prompt(question, &context, profile);
                debug!("Prompt personalizado de {} caracteres.", prompt.len());
                llm.generate(&prompt)
                    .await
                    .map_err(|e| AssistantError::GenerationFailed {
                        reason: e.to_string(),
                    })
            }
        }
    }
}
