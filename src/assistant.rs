//! Orquestador del asistente personalizado.
//!
//! Flujo de `answer`:
//!   1. Comprueba que el usuario tiene perfil y que la pregunta no está vacía.
//!   2. Reescribe la pregunta según el nivel del perfil.
//!   3. Recupera los `top_k` documentos más similares.
//!   4. Genera la respuesta (plantilla o LLM) según el estilo del perfil.
//!   5. Registra la interacción y actualiza el contador del perfil.
//!
//! Cualquier error de un colaborador se devuelve tal cual; si falla antes del
//! paso 5 no queda rastro de la interacción.

use anyhow::Result as AnyResult;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AssistantError, Result};
use crate::interactions::InteractionLog;
use crate::models::{
    Answer, Document, DocumentMetadata, ExpertiseLevel, Interaction, ResponseStyle, Stats,
    UserProfile,
};
use crate::profiles::ProfileRegistry;
use crate::query_adapter;
use crate::synthesizer::Generator;
use crate::vector_store::{short_id, InMemoryVectorStore, VectorStore};

pub const DEFAULT_TOP_K: usize = 3;

/// Estado completo del asistente. No hay singletons: quien lo crea es su dueño.
#[derive(Debug)]
pub struct Assistant<S: VectorStore = InMemoryVectorStore> {
    store: S,
    profiles: ProfileRegistry,
    interactions: InteractionLog,
    generator: Generator,
    top_k: usize,
}

impl Assistant<InMemoryVectorStore> {
    /// Store en memoria, generación por plantilla y `top_k` por defecto.
    pub fn new() -> Self {
        Self::with_store(InMemoryVectorStore::new(), Generator::default(), DEFAULT_TOP_K)
    }

    pub fn from_config(cfg: &AppConfig) -> AnyResult<Self> {
        let generator = Generator::from_config(cfg)?;
        Ok(Self::with_store(InMemoryVectorStore::new(), generator, cfg.top_k))
    }
}

impl Default for Assistant<InMemoryVectorStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: VectorStore> Assistant<S> {
    pub fn with_store(store: S, generator: Generator, top_k: usize) -> Self {
        Self {
            store,
            profiles: ProfileRegistry::new(),
            interactions: InteractionLog::new(),
            generator,
            top_k,
        }
    }

    /// Añade un documento a la base de conocimiento. Requiere contenido y tema.
    pub fn add_document(&mut self, text: &str, metadata: DocumentMetadata) -> Result<String> {
        if text.trim().is_empty() {
            return Err(AssistantError::invalid_argument(
                "document content must not be empty",
            ));
        }
        if metadata.topic.trim().is_empty() {
            return Err(AssistantError::invalid_argument(
                "document topic must not be empty",
            ));
        }
        self.store.add(text, metadata)
    }

    pub fn upsert_profile(
        &mut self,
        user_id: &str,
        expertise_level: ExpertiseLevel,
        response_style: ResponseStyle,
    ) -> Result<UserProfile> {
        self.profiles.upsert(user_id, expertise_level, response_style)
    }

    pub fn profile(&self, user_id: &str) -> Result<&UserProfile> {
        self.profiles.get(user_id)
    }

    /// Responde a la pregunta de un usuario con contexto recuperado.
    pub async fn answer(&mut self, user_id: &str, question: &str) -> Result<Answer> {
        let profile = self.profiles.get(user_id)?.clone();
        if question.trim().is_empty() {
            warn!("Pregunta vacía rechazada para '{}'.", user_id);
            return Err(AssistantError::invalid_argument(
                "question must not be empty or blank",
            ));
        }

        let retrieval_query = query_adapter::build_retrieval_query(question, &profile);
        debug!("Query adaptada: {}", retrieval_query);

        let hits = self.store.search(&retrieval_query, self.top_k)?;
        let documents: Vec<Document> = hits.into_iter().map(|hit| hit.document).collect();

        let response = self
            .generator
            .respond(question, &documents, &profile)
            .await?;

        self.interactions.log(user_id, question, &response);
        self.profiles.record_interaction(user_id)?;

        let sources: Vec<String> = documents.into_iter().map(|doc| doc.id).collect();
        info!(
            "Pregunta de '{}' respondida con {} fuentes ({}).",
            user_id,
            sources.len(),
            sources
                .iter()
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Answer {
            response,
            retrieved: sources.len(),
            sources,
        })
    }

    pub fn history(&self, user_id: &str) -> Vec<Interaction> {
        self.interactions.history(user_id)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_users: self.profiles.len(),
            total_interactions: self.interactions.len(),
            total_documents: self.store.len(),
        }
    }
}
