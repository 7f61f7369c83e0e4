// ============================================================
// Layer 5 — Chat Model Handle
// ============================================================
// The trained model is run by the framework's own NLU server. This
// crate talks to it over HTTP:
//
//   PUT  <nlu_url>/model         {"model_file": "models/m.tar.gz"}
//   →    204, the server now serves that artifact
//
//   POST <nlu_url>/model/parse   {"text": "hello there"}
//   →    {"intent": {"name": "greet", "confidence": 0.98},
//         "entities": [], "text": "hello there", ...}
//
// ArtifactModelLoader checks the artifact exists and has the server
// load it before handing out a model. Every later parse is answered
// by that artifact.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::domain::traits::{ChatModel, ModelLoader};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RasaHttpModel {
    client:   Client,
    base_url: String,
    endpoint: String,
    artifact: PathBuf,
}

impl RasaHttpModel {
    pub fn new(nlu_url: &str, artifact: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = nlu_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint: format!("{base_url}/model/parse"),
            base_url,
            artifact: artifact.into(),
        })
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Make the NLU server replace its current model with this artifact
    pub fn load_artifact(&self) -> Result<()> {
        let endpoint = format!("{}/model", self.base_url);
        let response = self
            .client
            .put(&endpoint)
            .json(&json!({ "model_file": self.artifact }))
            .send()
            .with_context(|| format!("Failed to reach NLU server at '{endpoint}'"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!(
                "NLU server could not load '{}' ({status}): {body}",
                self.artifact.display()
            );
        }
        Ok(())
    }
}

impl ChatModel for RasaHttpModel {
    fn parse(&self, message: &str) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "text": message }))
            .send()
            .with_context(|| format!("Failed to reach NLU server at '{}'", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("NLU server responded with {status}: {body}");
        }

        response.json().context("Failed to decode NLU parse response")
    }
}

pub struct ArtifactModelLoader {
    nlu_url: String,
}

impl ArtifactModelLoader {
    pub fn new(nlu_url: impl Into<String>) -> Self {
        Self { nlu_url: nlu_url.into() }
    }
}

impl ModelLoader for ArtifactModelLoader {
    fn load(&self, artifact: &Path) -> Result<Arc<dyn ChatModel>> {
        if !artifact.exists() {
            bail!("model artifact '{}' does not exist", artifact.display());
        }
        let model = RasaHttpModel::new(&self.nlu_url, artifact)?;
        model.load_artifact()?;
        tracing::info!("Chat model ready: {}", model.artifact().display());
        Ok(Arc::new(model))
    }
}

/// Intent name out of a parse result (`/intent/name`)
pub fn predicted_intent(parse: &Value) -> Option<&str> {
    parse.pointer("/intent/name").and_then(Value::as_str)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{post, put},
        Json, Router,
    };
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Minimal NLU server on a background thread. Records every
    /// `PUT /model` body and answers it with `put_status`; parse
    /// requests always get a "greet" intent.
    fn spawn_nlu(put_status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let seen   = Arc::clone(&loaded);
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let app = Router::new()
                    .route(
                        "/model",
                        put(move |Json(body): Json<Value>| {
                            let seen = Arc::clone(&seen);
                            async move {
                                seen.lock().unwrap().push(body);
                                put_status
                            }
                        }),
                    )
                    .route(
                        "/model/parse",
                        post(|Json(body): Json<Value>| async move {
                            Json(json!({"text": body["text"], "intent": {"name": "greet"}}))
                        }),
                    );
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        (format!("http://{}", rx.recv().unwrap()), loaded)
    }

    fn artifact(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("20240101-model.tar.gz");
        std::fs::write(&path, b"model").unwrap();
        path
    }

    #[test]
    fn test_predicted_intent() {
        let parse = json!({"intent": {"name": "greet", "confidence": 0.9}, "entities": []});
        assert_eq!(predicted_intent(&parse), Some("greet"));
        assert_eq!(predicted_intent(&json!({"intent": null})), None);
    }

    #[test]
    fn test_endpoint_has_single_slash() {
        let m = RasaHttpModel::new("http://localhost:5006/", "models/m.tar.gz").unwrap();
        assert_eq!(m.endpoint, "http://localhost:5006/model/parse");
    }

    #[test]
    fn test_loader_rejects_missing_artifact() {
        let loader = ArtifactModelLoader::new("http://localhost:5006");
        let err = loader.load(Path::new("/nonexistent/model.tar.gz")).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_loader_puts_artifact_into_server() {
        let dir           = TempDir::new().unwrap();
        let path          = artifact(&dir);
        let (url, loaded) = spawn_nlu(StatusCode::NO_CONTENT);

        let model = ArtifactModelLoader::new(url).load(&path).unwrap();

        let bodies = loaded.lock().unwrap().clone();
        assert_eq!(bodies, vec![json!({"model_file": path.display().to_string()})]);

        let parse = model.parse("hi there").unwrap();
        assert_eq!(predicted_intent(&parse), Some("greet"));
        assert_eq!(parse["text"], "hi there");
    }

    #[test]
    fn test_server_refusing_artifact_fails_load() {
        let dir      = TempDir::new().unwrap();
        let path     = artifact(&dir);
        let (url, _) = spawn_nlu(StatusCode::INTERNAL_SERVER_ERROR);

        let err = ArtifactModelLoader::new(url).load(&path).err().unwrap();
        assert!(err.to_string().contains("could not load"));
    }

    #[test]
    fn test_unreachable_server_fails_load() {
        let dir  = TempDir::new().unwrap();
        let path = artifact(&dir);

        // A port that was just free has nothing listening on it
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let err  = ArtifactModelLoader::new(format!("http://127.0.0.1:{port}"))
            .load(&path)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to reach NLU server"));
    }
}
