//! Tipos de error del asistente.
//!
//! El núcleo falla rápido: cada colaborador devuelve su error tal cual y el
//! orquestador no lo enmascara.

use thiserror::Error;

/// Error principal de las operaciones del asistente.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    /// Usuario sin perfil registrado.
    #[error("No profile for user '{user_id}'. Create the profile before asking questions.")]
    NotFound { user_id: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Fallo del vector store subyacente.
    #[error("Document store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Fallo del colaborador de generación (LLM).
    #[error("Response generation failed: {reason}")]
    GenerationFailed { reason: String },
}

impl AssistantError {
    pub fn not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            user_id: user_id.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
