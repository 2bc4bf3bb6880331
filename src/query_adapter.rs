//! Adapta la pregunta del usuario a su perfil: query de recuperación y
//! prompt de generación. Funciones puras, sin efectos secundarios.

use crate::models::{ExpertiseLevel, ResponseStyle, UserProfile};

pub const BEGINNER_PREFIX: &str = "Explain simply: ";
pub const EXPERT_SUFFIX: &str = " (technical/advanced details)";

/// Reescribe la pregunta según el nivel de experiencia del perfil.
pub fn build_retrieval_query(question: &str, profile: &UserProfile) -> String {
    match profile.expertise_level {
        ExpertiseLevel::Beginner => format!("{BEGINNER_PREFIX}{question}"),
        ExpertiseLevel::Intermediate => question.to_string(),
        ExpertiseLevel::Expert => format!("{question}{EXPERT_SUFFIX}"),
    }
}

fn style_instruction(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Professional => "Provide a professional, structured response",
        ResponseStyle::Casual => "Use a friendly, conversational tone",
        ResponseStyle::Technical => "Focus on technical details and implementation",
        ResponseStyle::Creative => "Use creative examples and analogies",
    }
}

fn level_instruction(level: ExpertiseLevel) -> &'static str {
    match level {
        ExpertiseLevel::Beginner => "Explain concepts simply with basic examples",
        ExpertiseLevel::Intermediate => "Provide balanced detail with practical examples",
        ExpertiseLevel::Expert => "Include advanced concepts and technical depth",
    }
}

/// Prompt personalizado para el colaborador de generación.
/// `context` son los textos de los documentos recuperados.
pub fn build_prompt(question: &str, context: &[&str], profile: &UserProfile) -> String {
    format!(
        "Based on the following context, answer the user's question.\n\n\
         Context:\n{context}\n\n\
         User Question: {question}\n\n\
         Instructions:\n\
         - {style}\n\
         - {level}\n\
         - Make the response personally relevant and actionable\n\n\
         Response:\n",
        context = context.join("\n\n"),
        style = style_instruction(profile.response_style),
        level = level_instruction(profile.expertise_level),
    )
}
