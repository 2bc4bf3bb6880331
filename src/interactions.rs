//! Log append-only de interacciones pregunta/respuesta.

use chrono::Utc;

use crate::models::Interaction;

#[derive(Debug, Default)]
pub struct InteractionLog {
    records: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, user_id: &str, query: &str, response: &str) {
        self.records.push(Interaction {
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            query: query.to_string(),
            response: response.to_string(),
        });
    }

    /// Interacciones del usuario, de la más antigua a la más reciente.
    pub fn history(&self, user_id: &str) -> Vec<Interaction> {
        self.records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
