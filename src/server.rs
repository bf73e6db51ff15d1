use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::handlers::{AnalyzeError, Analyzer};
use crate::models::AnalysisResult;

pub const IMAGE_FIELD: &str = "image";

pub struct AppState {
    pub analyzer: Analyzer,
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        log::warn!("⚠️ Rejected multipart body: {}", err.body_text());
        ApiError {
            status: err.status(),
            message: format!("invalid multipart body: {}", err.body_text()),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        log::warn!("⚠️ Rejected request: {}", rejection.body_text());
        ApiError {
            status: rejection.status(),
            message: format!("invalid multipart body: {}", rejection.body_text()),
        }
    }
}

pub fn create_router(analyzer: Analyzer, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { analyzer });

    Router::new()
        .route("/", get(root_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    log::info!("🔔 Analysis request received");

    let mut multipart = multipart?;
    let mut image: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            let is_file = field.file_name().is_some();
            let data = field.bytes().await?;
            // An empty text field counts as absent; an empty file does not.
            if is_file || !data.is_empty() {
                image = Some(data.to_vec());
            }
            break;
        }
    }

    let result = state.analyzer.analyze(image).await?;
    Ok(Json(result))
}

async fn root_handler() -> &'static str {
    "Food analysis service - POST an image to /api/analyze"
}

async fn health_check() -> &'static str {
    "OK"
}
