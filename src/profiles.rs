//! Registro en memoria de perfiles de usuario.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::error::{AssistantError, Result};
use crate::models::{ExpertiseLevel, ResponseStyle, UserProfile};

#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, UserProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea el perfil o actualiza nivel y estilo de uno existente.
    /// `interaction_count` y `created_at` se conservan.
    pub fn upsert(
        &mut self,
        user_id: &str,
        expertise_level: ExpertiseLevel,
        response_style: ResponseStyle,
    ) -> Result<UserProfile> {
        if user_id.trim().is_empty() {
            return Err(AssistantError::invalid_argument("user id must not be blank"));
        }

        let profile = self
            .profiles
            .entry(user_id.to_string())
            .and_modify(|p| {
                p.expertise_level = expertise_level;
                p.response_style = response_style;
            })
            .or_insert_with(|| UserProfile {
                user_id: user_id.to_string(),
                expertise_level,
                response_style,
                interaction_count: 0,
                created_at: Utc::now(),
            });

        info!(
            "Perfil '{}' guardado (nivel: {}, estilo: {}).",
            user_id, expertise_level, response_style
        );
        Ok(profile.clone())
    }

    pub fn get(&self, user_id: &str) -> Result<&UserProfile> {
        self.profiles
            .get(user_id)
            .ok_or_else(|| AssistantError::not_found(user_id))
    }

    pub fn record_interaction(&mut self, user_id: &str) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| AssistantError::not_found(user_id))?;
        profile.interaction_count += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_creates_then_updates_preserving_count() {
        let mut registry = ProfileRegistry::new();
        let created = registry
            .upsert("u1", ExpertiseLevel::Beginner, ResponseStyle::Casual)
            .unwrap();
        assert_eq!(created.interaction_count, 0);

        registry.record_interaction("u1").unwrap();
        registry.record_interaction("u1").unwrap();

        let updated = registry
            .upsert("u1", ExpertiseLevel::Expert, ResponseStyle::Technical)
            .unwrap();
        assert_eq!(updated.expertise_level, ExpertiseLevel::Expert);
        assert_eq!(updated.response_style, ResponseStyle::Technical);
        assert_eq!(updated.interaction_count, 2);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_users_are_not_found() {
        let mut registry = ProfileRegistry::new();
        assert_eq!(
            registry.get("ghost").unwrap_err(),
            AssistantError::not_found("ghost")
        );
        assert_eq!(
            registry.record_interaction("ghost").unwrap_err(),
            AssistantError::not_found("ghost")
        );
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let mut registry = ProfileRegistry::new();
        let err = registry
            .upsert("  ", ExpertiseLevel::Beginner, ResponseStyle::Casual)
            .unwrap_err();
        assert!(matches!(err, AssistantError::InvalidArgument { .. }));
        assert!(registry.is_empty());
    }
}
