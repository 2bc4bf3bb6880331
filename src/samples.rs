//! Documentos de ejemplo para arrancar con una base de conocimiento no vacía.

use crate::assistant::Assistant;
use crate::error::Result;
use crate::models::{DocumentMetadata, ExpertiseLevel};
use crate::vector_store::VectorStore;

pub const SAMPLE_SOURCE: &str = "sample";

/// (tema, dificultad, contenido)
pub const SAMPLE_DOCUMENTS: [(&str, ExpertiseLevel, &str); 3] = [
    (
        "AI basics",
        ExpertiseLevel::Beginner,
        "Artificial Intelligence (AI) is a branch of computer science that aims to create intelligent machines capable of performing tasks that typically require human intelligence.",
    ),
    (
        "Machine Learning",
        ExpertiseLevel::Intermediate,
        "Machine Learning algorithms can be categorized into supervised, unsupervised, and reinforcement learning approaches, each with specific use cases and implementation strategies.",
    ),
    (
        "Deep Learning",
        ExpertiseLevel::Expert,
        "Advanced neural network architectures like Transformers have revolutionized natural language processing through attention mechanisms and parallel processing capabilities.",
    ),
];

/// Añade los documentos de ejemplo y devuelve sus ids. Repetirlo no duplica nada.
pub fn seed_sample_documents<S: VectorStore>(assistant: &mut Assistant<S>) -> Result<Vec<String>> {
    SAMPLE_DOCUMENTS
        .iter()
        .map(|(topic, difficulty, text)| {
            assistant.add_document(
                text,
                DocumentMetadata {
                    topic: topic.to_string(),
                    difficulty_level: *difficulty,
                    source: SAMPLE_SOURCE.to_string(),
                },
            )
        })
        .collect()
}
