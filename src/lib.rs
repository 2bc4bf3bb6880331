//! Asistente de conocimiento personalizado: recuperación de documentos y
//! respuestas adaptadas al perfil (nivel de experiencia y estilo) de cada usuario.

pub mod api;
pub mod app_state;
pub mod assistant;
pub mod config;
pub mod error;
pub mod interactions;
pub mod llm;
pub mod models;
pub mod profiles;
pub mod query_adapter;
pub mod samples;
pub mod synthesizer;
pub mod vector_store;

pub use assistant::Assistant;
pub use error::{AssistantError, Result};
pub use models::{
    Answer, Document, DocumentMetadata, ExpertiseLevel, Interaction, ResponseStyle, ScoredDocument,
    Stats, UserProfile,
};
pub use vector_store::{InMemoryVectorStore, VectorStore};
