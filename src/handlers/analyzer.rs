use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::handlers::prompt::build_prompt;
use crate::models::schema::{self, SchemaError};
use crate::models::AnalysisResult;
use crate::services::{ImageStore, VisionModel};

/// Failures of one analysis request. `Display` is the client-facing message.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no image uploaded")]
    MissingImage,

    #[error("Error uploading image")]
    Storage(anyhow::Error),

    #[error("Error analyzing image")]
    Model(anyhow::Error),

    #[error("No content")]
    EmptyResponse,

    #[error("Error occurred while parsing response: {0}")]
    Schema(#[from] SchemaError),
}

impl AnalyzeError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalyzeError::MissingImage)
    }
}

/// Where a request currently is. Any failure ends the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReceivingUpload,
    Uploading,
    AwaitingModel,
    Validating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ReceivingUpload => "receiving upload",
            Stage::Uploading => "uploading",
            Stage::AwaitingModel => "awaiting model",
            Stage::Validating => "validating",
        };
        write!(f, "{}", s)
    }
}

/// Uploads a photo, asks the model about it and validates the answer.
///
/// Holds no per-request state; one instance serves every request.
pub struct Analyzer {
    store: Arc<dyn ImageStore>,
    model: Arc<dyn VisionModel>,
}

impl Analyzer {
    pub fn new(store: Arc<dyn ImageStore>, model: Arc<dyn VisionModel>) -> Self {
        Self { store, model }
    }

    pub async fn analyze(&self, image: Option<Vec<u8>>) -> Result<AnalysisResult, AnalyzeError> {
        let image = image.ok_or_else(|| fail(Stage::ReceivingUpload, AnalyzeError::MissingImage))?;
        log::info!("📸 Received image: {} bytes", image.len());

        log::debug!("➡️ {}", Stage::Uploading);
        let image_url = self
            .store
            .upload(image)
            .await
            .map_err(|e| fail(Stage::Uploading, AnalyzeError::Storage(e)))?;

        log::debug!("➡️ {}", Stage::AwaitingModel);
        let prompt = build_prompt(&image_url);
        let content = self
            .model
            .complete_json(&prompt)
            .await
            .map_err(|e| fail(Stage::AwaitingModel, AnalyzeError::Model(e)))?
            .filter(|text| !text.is_empty())
            .ok_or_else(|| fail(Stage::AwaitingModel, AnalyzeError::EmptyResponse))?;

        log::debug!("➡️ {}", Stage::Validating);
        let result = schema::parse_analysis(&content)
            .map_err(|e| fail(Stage::Validating, AnalyzeError::from(e)))?;

        log::debug!("✅ Validated model output (isFood={})", result.is_food());
        match &result {
            AnalysisResult::Food(details) => {
                log::info!(
                    "🍽️ Recognised dish: {} ({}, {})",
                    details.dish_name,
                    details.cuisine,
                    details.difficulty
                )
            }
            AnalysisResult::NotFood => log::info!("🚫 Image is not food"),
        }

        Ok(result)
    }
}

fn fail(stage: Stage, err: AnalyzeError) -> AnalyzeError {
    match &err {
        AnalyzeError::Storage(cause) | AnalyzeError::Model(cause) => {
            log::error!("❌ Failed while {}: {}: {:#}", stage, err, cause)
        }
        _ => log::error!("❌ Failed while {}: {}", stage, err),
    }
    err
}
