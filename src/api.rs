use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    error::AssistantError,
    models::{DocumentMetadata, ExpertiseLevel, Interaction, ResponseStyle, Stats, UserProfile},
};

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct ProfilePayload {
    user_id: String,
    expertise_level: String,
    response_style: String,
}

#[derive(Deserialize)]
pub struct AskPayload {
    user_id: String,
    question: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AskResponse {
    pub response: String,
    pub sources: Vec<String>,
    pub retrieved_docs: usize,
    pub personalization_applied: bool,
    pub user_profile: UserProfile,
}

#[derive(Deserialize)]
pub struct AddDocumentPayload {
    content: String,
    topic: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddDocumentResponse {
    pub id: String,
}

/// Error de la API: traduce cada tipo de error del núcleo a un código HTTP.
#[derive(Debug)]
pub struct ApiError(AssistantError);

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AssistantError::NotFound { .. } => StatusCode::NOT_FOUND,
            AssistantError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AssistantError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AssistantError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self.0);
        } else {
            warn!("Petición rechazada: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/profiles", post(upsert_profile_handler))
        .route("/api/profiles/:user_id", get(get_profile_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/documents", post(add_document_handler))
        .route("/api/history/:user_id", get(history_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn upsert_profile_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<UserProfile>, ApiError> {
    let level: ExpertiseLevel = payload.expertise_level.parse()?;
    let style: ResponseStyle = payload.response_style.parse()?;

    let profile = state
        .assistant
        .lock()
        .await
        .upsert_profile(&payload.user_id, level, style)?;
    Ok(Json(profile))
}

#[axum::debug_handler]
async fn get_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let assistant = state.assistant.lock().await;
    Ok(Json(assistant.profile(&user_id)?.clone()))
}

#[axum::debug_handler]
async fn ask_handler(
    State(state): State<AppState>,
    Json(payload): Json<AskPayload>,
) -> Result<Json<AskResponse>, ApiError> {
    let mut assistant = state.assistant.lock().await;
    let answer = assistant.answer(&payload.user_id, &payload.question).await?;
    let user_profile = assistant.profile(&payload.user_id)?.clone();

    Ok(Json(AskResponse {
        response: answer.response,
        retrieved_docs: answer.retrieved,
        sources: answer.sources,
        personalization_applied: true,
        user_profile,
    }))
}

#[axum::debug_handler]
async fn add_document_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddDocumentPayload>,
) -> Result<(StatusCode, Json<AddDocumentResponse>), ApiError> {
    let difficulty_level = match payload.difficulty.as_deref() {
        Some(raw) => raw.parse()?,
        None => ExpertiseLevel::default(),
    };
    let metadata = DocumentMetadata {
        topic: payload.topic,
        difficulty_level,
        source: payload.source.unwrap_or_else(|| "api".to_string()),
    };

    let id = state
        .assistant
        .lock()
        .await
        .add_document(&payload.content, metadata)?;
    Ok((StatusCode::CREATED, Json(AddDocumentResponse { id })))
}

#[axum::debug_handler]
async fn history_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Interaction>> {
    Json(state.assistant.lock().await.history(&user_id))
}

#[axum::debug_handler]
async fn stats_handler(State(state): State<AppState>) -> Json<Stats> {
    Json(state.assistant.lock().await.stats())
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Ok(mut sender) = state.shutdown_sender.lock() {
        if let Some(sender) = sender.take() {
            let _ = sender.send(());
        }
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assistant::Assistant, config::AppConfig, samples};

    fn test_state() -> AppState {
        let mut assistant = Assistant::new();
        samples::seed_sample_documents(&mut assistant).unwrap();
        AppState::new(AppConfig::default(), assistant).0
    }

    fn profile_payload(user_id: &str, level: &str, style: &str) -> ProfilePayload {
        ProfilePayload {
            user_id: user_id.to_string(),
            expertise_level: level.to_string(),
            response_style: style.to_string(),
        }
    }

    #[test]
    fn error_kinds_map_to_status_codes() {
        let cases = [
            (AssistantError::not_found("u"), StatusCode::NOT_FOUND),
            (AssistantError::invalid_argument("x"), StatusCode::BAD_REQUEST),
            (
                AssistantError::StoreUnavailable { reason: "down".into() },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AssistantError::GenerationFailed { reason: "timeout".into() },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn ask_returns_answer_and_updated_profile() {
        let state = test_state();
        upsert_profile_handler(
            State(state.clone()),
            Json(profile_payload("user_001", "beginner", "casual")),
        )
        .await
        .unwrap();

        let Json(body) = ask_handler(
            State(state.clone()),
            Json(AskPayload {
                user_id: "user_001".to_string(),
                question: "What is AI?".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(body.retrieved_docs, 3);
        assert!(body.personalization_applied);
        assert_eq!(body.user_profile.interaction_count, 1);

        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_interactions, 1);
        assert_eq!(stats.total_documents, 3);
    }

    #[tokio::test]
    async fn malformed_profile_enums_are_bad_requests() {
        let state = test_state();
        let err = upsert_profile_handler(
            State(state),
            Json(profile_payload("u1", "wizard", "casual")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_of_unknown_user_is_empty() {
        let state = test_state();
        let Json(history) = history_handler(State(state), Path("ghost".to_string())).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_lists_answered_questions_in_order() {
        let state = test_state();
        upsert_profile_handler(
            State(state.clone()),
            Json(profile_payload("u1", "expert", "technical")),
        )
        .await
        .unwrap();
        for question in ["What is AI?", "What are transformers?"] {
            ask_handler(
                State(state.clone()),
                Json(AskPayload {
                    user_id: "u1".to_string(),
                    question: question.to_string(),
                }),
            )
            .await
            .unwrap();
        }

        let Json(history) = history_handler(State(state), Path("u1".to_string())).await;
        let queries: Vec<_> = history.iter().map(|i| i.query.as_str()).collect();
        assert_eq!(queries, vec!["What is AI?", "What are transformers?"]);
    }

    #[tokio::test]
    async fn add_document_rejects_missing_topic() {
        let state = test_state();
        let err = add_document_handler(
            State(state),
            Json(AddDocumentPayload {
                content: "Ownership rules.".to_string(),
                topic: String::new(),
                difficulty: None,
                source: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shutdown_fires_the_signal_once() {
        let (state, rx) = AppState::new(AppConfig::default(), Assistant::new());
        let status = shutdown_handler(State(state.clone())).await.into_response().status();
        assert_eq!(status, StatusCode::OK);
        assert!(rx.await.is_ok());
        // Una segunda petición no encuentra emisor, pero sigue respondiendo OK.
        let status = shutdown_handler(State(state)).await.into_response().status();
        assert_eq!(status, StatusCode::OK);
    }
}
