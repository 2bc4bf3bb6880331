//! Vector store en memoria para los documentos de la base de conocimiento.
//!
//! API pública:
//!   - `VectorStore` (contrato `add` / `search` que consume el orquestador).
//!   - `InMemoryVectorStore`, implementación por defecto.
//!   - `content_id(&str)`.
//!
//! Los embeddings son vectores dispersos de frecuencia de términos y la
//! búsqueda es exhaustiva por similitud coseno: con una base de conocimiento
//! de decenas de documentos no compensa un índice ANN. Cualquier otro store
//! que cumpla el trait es intercambiable.

use std::cmp::Ordering;
use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{AssistantError, Result};
use crate::models::{Document, DocumentMetadata, ScoredDocument};

/// Palabras vacías que no aportan a la similitud.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

/// Contrato del colaborador de almacenamiento vectorial.
pub trait VectorStore: Send {
    /// Inserta el documento si no existe y devuelve su id (derivado del texto).
    fn add(&mut self, text: &str, metadata: DocumentMetadata) -> Result<String>;

    /// Devuelve hasta `k` documentos ordenados por similitud descendente.
    /// Con puntuaciones iguales se conserva el orden de inserción.
    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Id estable de un documento: SHA-256 hexadecimal del texto.
pub fn content_id(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Vector disperso término → peso.
type SparseVector = HashMap<String, f32>;

#[derive(Debug, Clone)]
struct IndexedDocument {
    document: Document,
    embedding: SparseVector,
    norm: f32,
}

/// Store en memoria; vive lo que vive el proceso.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: Vec<IndexedDocument>,
    positions: HashMap<String, usize>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.positions.get(id).map(|&pos| &self.entries[pos].document)
    }
}

impl VectorStore for InMemoryVectorStore {
    fn add(&mut self, text: &str, metadata: DocumentMetadata) -> Result<String> {
        let id = content_id(text);
        if self.positions.contains_key(&id) {
            debug!("Documento {} ya existe, se omite.", short_id(&id));
            return Ok(id);
        }

        let embedding = embed(text);
        let norm = norm(&embedding);
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push(IndexedDocument {
            document: Document {
                id: id.clone(),
                text: text.to_string(),
                metadata,
            },
            embedding,
            norm,
        });

        info!("Documento {} añadido ({} en total).", short_id(&id), self.entries.len());
        Ok(id)
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 {
            return Err(AssistantError::invalid_argument(
                "k must be a positive number of documents",
            ));
        }

        let query_vec = embed(query);
        let query_norm = norm(&query_vec);

        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&query_vec, query_norm, &entry.embedding, entry.norm),
            })
            .collect();

        // sort_by es estable: empates en orden de inserción.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        for hit in &scored {
            debug!("  {} score={:.4}", short_id(&hit.document.id), hit.score);
        }
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Primeros caracteres del id, para logs.
pub(crate) fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Frecuencia de términos normalizada por el número de tokens.
fn embed(text: &str) -> SparseVector {
    let tokens = tokenize(text);
    let mut tf = SparseVector::new();
    for token in &tokens {
        *tf.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f32;
    for weight in tf.values_mut() {
        *weight /= total;
    }
    tf
}

fn norm(v: &SparseVector) -> f32 {
    v.values().map(|w| w * w).sum::<f32>().sqrt()
}

fn cosine_similarity(a: &SparseVector, norm_a: f32, b: &SparseVector, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // Se itera sobre el vector más pequeño.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();
    dot / (norm_a * norm_b)
}
