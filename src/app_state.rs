use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, Mutex as AsyncMutex};

use crate::{assistant::Assistant, config::AppConfig};

/// Estado compartido entre handlers. El asistente va tras un único cerrojo:
/// cada petición lo mantiene durante todo `answer`, así el log y el contador
/// del perfil avanzan juntos aunque haya varios usuarios a la vez.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub assistant: Arc<AsyncMutex<Assistant>>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(config: AppConfig, assistant: Assistant) -> (Self, oneshot::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let state = Self {
            config,
            assistant: Arc::new(AsyncMutex::new(assistant)),
            shutdown_sender: Arc::new(Mutex::new(Some(shutdown_tx))),
        };
        (state, shutdown_rx)
    }
}
