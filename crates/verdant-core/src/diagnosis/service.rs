//! The remote diagnosis model interface.
//!
//! The concrete client (Gemini REST, or a mock in tests) is swappable behind
//! [`DiagnosisModel`]; the orchestration layer only depends on this trait.

use super::model::{DetectionResult, RemedyResult};
use crate::image::ImagePayload;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a remote model call.
///
/// Retryability is classified here so callers can decide on their own retry
/// policy; the pipeline itself never retries automatically.
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    /// The request never produced an HTTP response (connect, timeout, DNS).
    #[error("model request failed: {message}")]
    Transport { message: String, retryable: bool },

    /// The model endpoint answered with a non-success status.
    #[error("model returned HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The response body could not be interpreted as a usable result.
    #[error("model response was unusable: {0}")]
    Malformed(String),

    /// The client is misconfigured (missing API key, bad model name).
    #[error("model configuration error: {0}")]
    Config(String),
}

impl ModelError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } | Self::Http { retryable, .. } => *retryable,
            Self::Malformed(_) | Self::Config(_) => false,
        }
    }
}

/// The two-operation interface to the hosted generative model.
///
/// Both operations suspend the caller until the remote model responds, and
/// are always awaited sequentially within one pipeline run.
#[async_trait::async_trait]
pub trait DiagnosisModel: Send + Sync {
    /// Classifies the plant and any visible disease in the image.
    ///
    /// The image must be a non-empty payload of a declared raster type
    /// (enforced by [`ImagePayload`] construction); no further local
    /// validation is performed. Returns a fully-populated
    /// [`DetectionResult`] or fails.
    async fn detect(&self, image: &ImagePayload) -> Result<DetectionResult, ModelError>;

    /// Proposes causes, remedies, and optional supplements for a disease.
    ///
    /// `disease` is either a real disease label or the no-disease sentinel;
    /// in the sentinel case the implementation must ask for general
    /// plant-health maintenance guidance and supplements are not expected.
    async fn suggest_remedies(
        &self,
        disease: &str,
        plant_description: &str,
    ) -> Result<RemedyResult, ModelError>;
}
