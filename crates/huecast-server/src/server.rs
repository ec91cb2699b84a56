//! HTTP server implementation for the color prediction API.
//!
//! Exposes `POST /predict` plus health and artifact-management endpoints
//! around a [`huecast_engine::Engine`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use huecast_core::{ModelKind, PredictRequest};
use huecast_engine::{Engine, EngineConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS.
    pub cors: bool,
    /// Artifacts directory to load at startup (optional - the server can
    /// start empty and load via `/api/artifacts/reload`).
    pub artifacts_dir: Option<PathBuf>,
    /// Preferred default model kind.
    pub default_model: Option<ModelKind>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".parse().unwrap(),
            cors: true,
            artifacts_dir: None,
            default_model: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    fn engine_config(&self, dir: PathBuf) -> EngineConfig {
        let mut builder = EngineConfig::builder().artifacts_dir(dir);
        if let Some(kind) = self.default_model {
            builder = builder.default_model(kind);
        }
        builder.build()
    }
}

/// Builder for `ServerConfig`.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
    artifacts_dir: Option<PathBuf>,
    default_model: Option<ModelKind>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    #[must_use]
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    #[must_use]
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Sets the artifacts directory to load at startup.
    #[must_use]
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Sets the preferred default model kind.
    #[must_use]
    pub fn default_model(mut self, kind: ModelKind) -> Self {
        self.default_model = Some(kind);
        self
    }

    /// Builds the server config.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            cors: self.cors.unwrap_or(true),
            artifacts_dir: self.artifacts_dir,
            default_model: self.default_model,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The prediction engine (None until artifacts load successfully).
    pub engine: RwLock<Option<Arc<Engine>>>,
    /// Server configuration.
    pub config: ServerConfig,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Creates new app state with the given config.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            engine: RwLock::new(None),
            config,
            start_time: Instant::now(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(config.clone()));
        Self { config, state }
    }

    /// Creates the router.
    fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/predict", post(predict))
            // Health endpoints
            .route("/health", get(health))
            .route("/ready", get(ready))
            // Internal management endpoints
            .route("/api/status", get(server_status))
            .route("/api/models", get(list_models))
            .route("/api/artifacts/reload", post(reload_artifacts))
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Loads artifacts into the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts cannot be loaded.
    pub async fn load_artifacts(&self, dir: PathBuf) -> huecast_core::Result<()> {
        tracing::info!(dir = %dir.display(), "Loading artifacts");

        let engine = Engine::new(self.config.engine_config(dir))?;
        let mut engine_guard = self.state.engine.write().await;
        *engine_guard = Some(Arc::new(engine));

        Ok(())
    }

    /// Runs the server.
    ///
    /// A failed startup load leaves the server running; `/predict` and
    /// `/ready` report 503 until a reload succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start.
    pub async fn run(self) -> huecast_core::Result<()> {
        if let Some(dir) = self.config.artifacts_dir.clone() {
            if let Err(e) = self.load_artifacts(dir).await {
                tracing::error!(error = %e, "Failed to load artifacts");
            }
        } else {
            tracing::warn!("Server started without artifacts");
            tracing::warn!("All predictions will fail until artifacts are loaded.");
            tracing::warn!("Either restart with: huecast serve --artifacts <dir>");
            tracing::warn!("or POST to /api/artifacts/reload with {{\"artifacts_dir\": \"<dir>\"}}");
        }

        let router = self.router();

        tracing::info!(addr = %self.config.addr, "Starting huecast server");
        eprintln!(
            "\n\x1b[32m✓\x1b[0m Server listening on http://{}",
            self.config.addr
        );
        eprintln!("  Press Ctrl+C to stop\n");

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(huecast_core::Error::Io)?;

        let shutdown_signal = async {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    eprintln!("\nReceived Ctrl+C, shutting down gracefully...");
                },
                () = terminate => {
                    eprintln!("\nReceived SIGTERM, shutting down gracefully...");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| huecast_core::Error::internal(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

// === Error Response ===

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
            },
        }
    }
}

fn error_response(status: StatusCode, message: &str, error_type: &str) -> Response {
    let body = Json(ErrorResponse::new(message, error_type));
    (status, body).into_response()
}

// === Health Endpoints ===

async fn health() -> &'static str {
    "OK"
}

async fn ready(State(state): State<Arc<AppState>>) -> Response {
    let engine = state.engine.read().await;
    if engine.is_some() {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "No artifacts loaded").into_response()
    }
}

#[derive(Debug, Serialize)]
struct ServerStatus {
    status: String,
    uptime_seconds: u64,
    artifacts_loaded: bool,
    models: Vec<ModelKind>,
}

async fn server_status(State(state): State<Arc<AppState>>) -> Json<ServerStatus> {
    let engine = state.engine.read().await;
    let models = engine
        .as_ref()
        .map(|e| e.loaded_kinds())
        .unwrap_or_default();

    Json(ServerStatus {
        status: "running".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        artifacts_loaded: engine.is_some(),
        models,
    })
}

// === Model Listing ===

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<ModelKind>,
    default: Option<ModelKind>,
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let engine = state.engine.read().await;

    match engine.as_ref() {
        Some(engine) => Json(ModelsResponse {
            models: engine.loaded_kinds(),
            default: Some(engine.default_kind()),
        }),
        None => Json(ModelsResponse {
            models: vec![],
            default: None,
        }),
    }
}

// === Artifact Management ===

#[derive(Debug, Deserialize)]
struct ReloadRequest {
    /// Directory to load from; defaults to the server's configured one.
    artifacts_dir: Option<PathBuf>,
}

async fn reload_artifacts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReloadRequest>,
) -> Response {
    let dir = match req
        .artifacts_dir
        .or_else(|| state.config.artifacts_dir.clone())
    {
        Some(dir) => dir,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "No artifacts directory configured or supplied",
                "invalid_request_error",
            );
        }
    };

    tracing::info!(dir = %dir.display(), "Reloading artifacts via API");

    let engine = match Engine::new(state.config.engine_config(dir.clone())) {
        Ok(engine) => engine,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to load artifacts: {}", e),
                "artifact_load_error",
            );
        }
    };

    let mut engine_guard = state.engine.write().await;
    *engine_guard = Some(Arc::new(engine));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "loaded",
            "artifacts_dir": dir,
        })),
    )
        .into_response()
}

// === Predict Endpoint ===

/// Incoming payload, validated by hand so missing/blank text and unknown
/// model names yield 400 rather than a framework rejection.
#[derive(Debug, Deserialize)]
struct PredictPayload {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PredictPayload>,
) -> Response {
    let start = Instant::now();

    let text = payload.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'text'", "invalid_request_error");
    }

    let model = match payload.model.as_deref() {
        Some(name) => match name.parse::<ModelKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &e.to_string(),
                    "invalid_request_error",
                );
            }
        },
        None => None,
    };

    let engine_guard = state.engine.read().await;
    let engine = match engine_guard.as_ref() {
        Some(engine) => Arc::clone(engine),
        None => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Model artifacts not loaded",
                "artifacts_not_loaded",
            );
        }
    };
    drop(engine_guard); // Release lock early

    let mut request = PredictRequest::new(text);
    request.model = model;
    let request_id = request.request_id.clone();

    match engine.predict(&request) {
        Ok(prediction) => {
            tracing::debug!(
                request_id = %request_id,
                model = %prediction.model,
                hex = %prediction.hex,
                latency_ms = start.elapsed().as_millis() as u64,
                "Prediction finished"
            );
            Json(prediction).into_response()
        }
        Err(e) if e.is_client_error() => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string(), "invalid_request_error")
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Prediction error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), "prediction_error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:3000".parse().unwrap())
            .cors(false)
            .artifacts_dir("/srv/huecast")
            .default_model(ModelKind::Ridge)
            .build();

        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert!(!config.cors);
        assert_eq!(config.artifacts_dir, Some(PathBuf::from("/srv/huecast")));
        assert_eq!(config.default_model, Some(ModelKind::Ridge));
    }

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::new("Missing 'text'", "invalid_request_error");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": {
                    "message": "Missing 'text'",
                    "type": "invalid_request_error",
                }
            })
        );
    }

    #[test]
    fn test_predict_payload_tolerates_missing_fields() {
        let payload: PredictPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.text, None);
        assert_eq!(payload.model, None);
    }

    mod handlers {
        use super::*;

        use std::fs;
        use std::path::Path;

        use axum::body::Body;
        use axum::http::{header, Request};
        use http_body_util::BodyExt;
        use tempfile::tempdir;
        use tower::ServiceExt;

        fn write_artifacts(dir: &Path) {
            fs::write(
                dir.join("vectorizer.json"),
                serde_json::json!({
                    "vocabulary": {"calm": 0, "ocean": 1},
                    "idf": [1.0, 1.0],
                })
                .to_string(),
            )
            .unwrap();
            fs::write(
                dir.join("svm.json"),
                serde_json::json!({
                    "type": "linear",
                    "coefficients": [
                        [255.0, 0.0],
                        [0.0, 255.0],
                        [0.0, 0.0],
                    ],
                    "intercepts": [0.0, 0.0, 40.0],
                })
                .to_string(),
            )
            .unwrap();
        }

        fn empty_router() -> Router {
            Server::new(ServerConfig::builder().build()).router()
        }

        async fn loaded_router(dir: &Path) -> Router {
            let server =
                Server::new(ServerConfig::builder().artifacts_dir(dir).build());
            server.load_artifacts(dir.to_path_buf()).await.unwrap();
            server.router()
        }

        fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        }

        async fn body_json(response: Response) -> serde_json::Value {
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            serde_json::from_slice(&bytes).unwrap()
        }

        #[tokio::test]
        async fn test_predict_returns_prediction_body() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = loaded_router(dir.path()).await;

            let response = router
                .oneshot(post_json("/predict", serde_json::json!({"text": "calm ocean"})))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            // tf-idf [1/sqrt(2), 1/sqrt(2)]; 255/sqrt(2) rounds to 180.
            assert_eq!(
                body,
                serde_json::json!({
                    "input": "calm ocean",
                    "rgb": [180, 180, 40],
                    "hex": "#b4b428",
                    "model": "svm",
                })
            );
        }

        #[tokio::test]
        async fn test_predict_missing_text_is_400() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = loaded_router(dir.path()).await;

            for body in [
                serde_json::json!({}),
                serde_json::json!({"text": "   "}),
            ] {
                let response = router
                    .clone()
                    .oneshot(post_json("/predict", body))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::BAD_REQUEST);
                let body = body_json(response).await;
                assert_eq!(body["error"]["message"], "Missing 'text'");
            }
        }

        #[tokio::test]
        async fn test_predict_unknown_model_is_400() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = loaded_router(dir.path()).await;

            let response = router
                .oneshot(post_json(
                    "/predict",
                    serde_json::json!({"text": "calm", "model": "perceptron"}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["error"]["message"], "Unsupported model 'perceptron'");
        }

        #[tokio::test]
        async fn test_predict_unloaded_model_kind_is_400() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = loaded_router(dir.path()).await;

            // Known kind, but only svm.json exists on disk.
            let response = router
                .oneshot(post_json(
                    "/predict",
                    serde_json::json!({"text": "calm", "model": "ridge"}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn test_predict_without_artifacts_is_503() {
            let response = empty_router()
                .oneshot(post_json("/predict", serde_json::json!({"text": "calm"})))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            let body = body_json(response).await;
            assert_eq!(body["error"]["type"], "artifacts_not_loaded");
        }

        #[tokio::test]
        async fn test_ready_tracks_artifact_state() {
            let response = empty_router()
                .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let response = loaded_router(dir.path())
                .await
                .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_reload_from_bad_directory_is_500() {
            let dir = tempdir().unwrap(); // no artifacts inside

            let response = empty_router()
                .oneshot(post_json(
                    "/api/artifacts/reload",
                    serde_json::json!({"artifacts_dir": dir.path()}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert_eq!(body["error"]["type"], "artifact_load_error");
        }

        #[tokio::test]
        async fn test_reload_without_any_directory_is_400() {
            let response = empty_router()
                .oneshot(post_json("/api/artifacts/reload", serde_json::json!({})))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn test_reload_brings_the_server_up() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = empty_router();

            let response = router
                .clone()
                .oneshot(post_json(
                    "/api/artifacts/reload",
                    serde_json::json!({"artifacts_dir": dir.path()}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let response = router
                .oneshot(post_json("/predict", serde_json::json!({"text": "calm"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_status_reports_loaded_models() {
            let dir = tempdir().unwrap();
            write_artifacts(dir.path());
            let router = loaded_router(dir.path()).await;

            let response = router
                .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["artifacts_loaded"], true);
            assert_eq!(body["models"], serde_json::json!(["svm"]));
        }
    }
}
