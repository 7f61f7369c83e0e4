// ============================================================
// Layer 1 — Serving Facade: Shared State
// ============================================================
// The chat model is loaded lazily on first use. `OnceCell` makes
// concurrent first requests wait on a single load instead of each
// starting their own. A failed load leaves the cell empty so a later
// request can try again.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::domain::traits::{ChatModel, ModelLoader};
use crate::infra::config::Configuration;
use crate::server::ServeError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    loader:     Arc<dyn ModelLoader>,
    model:      Arc<OnceCell<Arc<dyn ChatModel>>>,
}

impl AppState {
    pub fn new(config: Configuration, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            config: Arc::new(config),
            loader,
            model:  Arc::new(OnceCell::new()),
        }
    }

    fn model_path(&self) -> PathBuf {
        self.config.deployment.model_path.clone()
    }

    /// True once a model has been loaded successfully
    pub fn is_initialized(&self) -> bool {
        self.model.initialized()
    }

    /// The chat model, loading it on first call.
    ///
    /// Load failures are logged and reported as `NotInitialized`.
    pub async fn model(&self) -> Result<Arc<dyn ChatModel>, ServeError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let path   = self.model_path();

                let loaded = tokio::task::spawn_blocking(move || loader.load(&path))
                    .await
                    .map_err(|e| anyhow::anyhow!("model loader panicked: {e}"))
                    .and_then(|r| r);

                match loaded {
                    Ok(model) => {
                        tracing::info!("Chat model loaded successfully");
                        Ok(model)
                    }
                    Err(e) => {
                        tracing::error!("Failed to load chat model: {e:#}");
                        Err(ServeError::NotInitialized)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(model))
    }
}
