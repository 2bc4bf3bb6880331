use axum::Router;
use personal_knowledge_rag::{
    api,
    app_state::AppState,
    assistant::Assistant,
    config::{self, GenerationMode},
    samples,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Cargar configuración
    let cfg = config::AppConfig::from_env()?;
    if cfg.generation_mode == GenerationMode::Llm {
        info!("Generación con LLM ({:?}, {}).", cfg.llm_provider, cfg.llm_chat_model);
    } else {
        info!("Generación por plantilla (determinista).");
    }

    // 3. Crear el asistente y sembrar la base de conocimiento
    let mut assistant = Assistant::from_config(&cfg)?;
    if cfg.seed_sample_documents {
        let ids = samples::seed_sample_documents(&mut assistant)?;
        info!("{} documentos de ejemplo cargados.", ids.len());
    }

    // 4. Estado compartido y canal de apagado
    let (app_state, shutdown_rx) = AppState::new(cfg.clone(), assistant);

    // 5. Router de la API
    let app = Router::new()
        .merge(api::create_router(app_state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // 6. Iniciar el servidor
    let listener = tokio::net::TcpListener::bind(&cfg.server_addr).await?;
    info!("🚀 Servidor escuchando en http://{}", cfg.server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            info!("Señal de apagado recibida, iniciando cierre del servidor.");
        })
        .await?;

    info!("✅ Servidor cerrado correctamente.");
    Ok(())
}
