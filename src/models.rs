//! Modelos de dominio: documentos, perfiles de usuario e interacciones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

/// Nivel de experiencia del usuario. Controla la reescritura de la query
/// y la profundidad de la respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl ExpertiseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for ExpertiseLevel {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            other => Err(AssistantError::invalid_argument(format!(
                "unknown expertise level '{other}' (expected beginner, intermediate or expert)"
            ))),
        }
    }
}

impl fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tono con el que se redactan las respuestas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Professional,
    Casual,
    Technical,
    Creative,
}

impl ResponseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Technical => "technical",
            Self::Creative => "creative",
        }
    }
}

impl FromStr for ResponseStyle {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "casual" => Ok(Self::Casual),
            "technical" => Ok(Self::Technical),
            "creative" => Ok(Self::Creative),
            other => Err(AssistantError::invalid_argument(format!(
                "unknown response style '{other}' (expected professional, casual, technical or creative)"
            ))),
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadatos asociados a un documento de la base de conocimiento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub topic: String,
    pub difficulty_level: ExpertiseLevel,
    pub source: String,
}

/// Documento almacenado. El `id` se deriva del contenido, así que dos
/// documentos con el mismo texto comparten id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Documento recuperado junto con su puntuación de similitud.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Perfil de un usuario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub expertise_level: ExpertiseLevel,
    pub response_style: ResponseStyle,
    pub interaction_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Registro de una pregunta/respuesta. Inmutable una vez añadido al log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub response: String,
}

/// Resultado de `Assistant::answer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub response: String,
    /// Ids de los documentos usados, en orden de relevancia.
    pub sources: Vec<String>,
    pub retrieved: usize,
}

/// Totales del sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_users: usize,
    pub total_interactions: usize,
    pub total_documents: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(
            " Expert ".parse::<ExpertiseLevel>().unwrap(),
            ExpertiseLevel::Expert
        );
        assert_eq!("CASUAL".parse::<ResponseStyle>().unwrap(), ResponseStyle::Casual);
    }

    #[test]
    fn malformed_enum_values_are_invalid_arguments() {
        let err = "guru".parse::<ExpertiseLevel>().unwrap_err();
        assert!(matches!(err, AssistantError::InvalidArgument { .. }));

        let err = "poetic".parse::<ResponseStyle>().unwrap_err();
        assert!(matches!(err, AssistantError::InvalidArgument { .. }));
    }

    #[test]
    fn enums_serialize_lowercase() {
        let json = serde_json::to_string(&ExpertiseLevel::Beginner).unwrap();
        assert_eq!(json, "\"beginner\"");
        let style: ResponseStyle = serde_json::from_str("\"technical\"").unwrap();
        assert_eq!(style, ResponseStyle::Technical);
    }
}
