use std::sync::Arc;

use tf_core::GenerationMode;
use tf_core::api::{GenerationRequest, GenerationResult, HealthReport};
use tf_core::upload::UploadedImage;

use crate::api::ApiStatus;

#[derive(Debug, Clone)]
pub enum TfEvent {
    Ui(UiEvent),
    App(AppEvent),
    Api(ApiEvent),
}

/// Actions emitted by the panels.
#[derive(Debug, Clone)]
pub enum UiEvent {
    CheckHealth,
    Generate {
        person: UploadedImage,
        style_guide: UploadedImage,
        request: GenerationRequest,
    },
    OpenArtifact(String),
    ResetForm,
}

/// State changes broadcast back to every panel.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ApiStatusChanged {
        status: ApiStatus,
        models_ready: bool,
    },
    GenerationStarted(GenerationMode),
    GenerationProgress {
        step: usize,
    },
    GenerationFinished(GenerationResult),
    GenerationFailed(String),
    PreviewLoaded(Arc<Vec<u8>>),
    PreviewFailed(String),
    FormCleared,
}

/// Results coming back from the API worker thread.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    HealthOk(HealthReport),
    HealthFailed(String),
    Generated(GenerationResult),
    GenerationFailed(String),
    PreviewLoaded(Arc<Vec<u8>>),
    PreviewFailed(String),
}
