use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::mode::GenerationMode;

/// Shown when a failed response carries no usable `detail` field.
pub const FALLBACK_FAILURE: &str = "Generation failed. Please try again.";

/// Multipart field names on the generation endpoints.
pub const FIELD_PERSON_IMAGE: &str = "person_image";
pub const FIELD_STYLE_GUIDE: &str = "style_guide";

/// Parameters of one generation request. The image payloads travel
/// separately; this is just the text side of the multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub mode: GenerationMode,
    pub format: OutputFormat,
}

impl GenerationRequest {
    /// Text fields of the outgoing multipart form. The output format is
    /// only sent in full-generation mode.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("prompt", self.prompt.clone())];
        if self.mode.includes_model() {
            fields.push(("output_format", self.format.id().to_string()));
        }
        fields
    }
}

/// Response body of both generation endpoints. `model_result` is only
/// present for full generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub person_description: String,
    pub style_description: String,
    pub toy_image: String,
    #[serde(default)]
    pub model_result: Option<ModelResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelResult {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub files: ModelFiles,
    #[serde(default)]
    pub formats: Vec<String>,
}

/// Server-relative paths of the downloadable 3D artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelFiles {
    #[serde(default)]
    pub ply: Option<String>,
    #[serde(default)]
    pub glb: Option<String>,
    #[serde(default)]
    pub preview_video: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    PointCloud,
    Mesh,
    PreviewVideo,
}

impl ArtifactKind {
    pub fn label(&self) -> &str {
        match self {
            Self::PointCloud => "Point Cloud (.ply)",
            Self::Mesh => "3D Model (.glb)",
            Self::PreviewVideo => "Preview Video (.mp4)",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::PointCloud => "✨",
            Self::Mesh => "🔶",
            Self::PreviewVideo => "🎬",
        }
    }
}

impl ModelFiles {
    /// Present artifacts in display order.
    pub fn artifacts(&self) -> Vec<(ArtifactKind, &str)> {
        let mut out = Vec::new();
        if let Some(p) = self.ply.as_deref() {
            out.push((ArtifactKind::PointCloud, p));
        }
        if let Some(p) = self.glb.as_deref() {
            out.push((ArtifactKind::Mesh, p));
        }
        if let Some(p) = self.preview_video.as_deref() {
            out.push((ArtifactKind::PreviewVideo, p));
        }
        out
    }
}

/// Body of `GET /health`. Any 2xx response already counts as healthy;
/// the flags are extra detail for the status badge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub genai_client: bool,
    #[serde(default)]
    pub trellis_pipeline: bool,
}

impl HealthReport {
    pub fn models_ready(&self) -> bool {
        self.genai_client && self.trellis_pipeline
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// `detail` field of a failed response body, if it has one.
pub fn detail_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|e| e.detail)
        .filter(|d| !d.trim().is_empty())
}

/// Error message for a non-success response: the server-provided `detail`
/// when present, otherwise the fixed fallback.
pub fn failure_message(body: &str) -> String {
    detail_from_body(body).unwrap_or_else(|| FALLBACK_FAILURE.to_string())
}

/// Download URL for a server-relative artifact path. The whole path is
/// percent-encoded into a single segment, slashes included, matching the
/// service's catch-all `/download/{file_path}` route.
pub fn download_url(base: &Url, artifact_path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::BadBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push("download")
        .push(artifact_path);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_only_omits_output_format() {
        let req = GenerationRequest {
            prompt: "a toy".into(),
            mode: GenerationMode::ImageOnly,
            format: OutputFormat::Mesh,
        };
        let fields = req.form_fields();
        assert_eq!(fields, vec![("prompt", "a toy".to_string())]);
    }

    #[test]
    fn test_full_mode_carries_format_token() {
        let req = GenerationRequest {
            prompt: "a toy".into(),
            mode: GenerationMode::Full,
            format: OutputFormat::RadianceField,
        };
        let fields = req.form_fields();
        assert!(fields.contains(&("output_format", "radiance_field".to_string())));
    }

    #[test]
    fn test_detail_extraction() {
        assert_eq!(
            detail_from_body(r#"{"detail": "Person file must be an image"}"#),
            Some("Person file must be an image".to_string())
        );
        assert_eq!(detail_from_body(r#"{"detail": "  "}"#), None);
        assert_eq!(detail_from_body("<html>502</html>"), None);
    }

    #[test]
    fn test_failure_message_fallback() {
        assert_eq!(failure_message("not json"), FALLBACK_FAILURE);
        assert_eq!(failure_message(r#"{"detail":"boom"}"#), "boom");
    }

    #[test]
    fn test_download_url_encodes_path() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let url = download_url(&base, "outputs/model_ab cd.ply").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/download/outputs%2Fmodel_ab%20cd.ply"
        );
    }

    #[test]
    fn test_download_url_with_base_path() {
        let base = Url::parse("http://host:9000/api/").unwrap();
        let url = download_url(&base, "outputs/a.glb").unwrap();
        assert_eq!(url.as_str(), "http://host:9000/api/download/outputs%2Fa.glb");
    }

    #[test]
    fn test_result_parsing_without_model() {
        let body = r#"{
            "success": true,
            "toy_image": "outputs/generated_toy_1.png",
            "person_description": "short hair, glasses",
            "style_description": "chibi, glossy vinyl"
        }"#;
        let result: GenerationResult = serde_json::from_str(body).unwrap();
        assert!(result.model_result.is_none());
        assert_eq!(result.toy_image, "outputs/generated_toy_1.png");
    }

    #[test]
    fn test_result_parsing_with_model() {
        let body = r#"{
            "success": true,
            "message": "Toy generation completed successfully",
            "person_description": "p",
            "style_description": "s",
            "toy_image": "outputs/toy.png",
            "model_result": {
                "success": true,
                "model_id": "1234",
                "files": {"ply": "outputs/model.ply", "preview_video": "outputs/preview.mp4"},
                "formats": ["gaussian"]
            }
        }"#;
        let result: GenerationResult = serde_json::from_str(body).unwrap();
        let files = result.model_result.unwrap().files;
        let artifacts = files.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0], (ArtifactKind::PointCloud, "outputs/model.ply"));
        assert_eq!(
            artifacts[1],
            (ArtifactKind::PreviewVideo, "outputs/preview.mp4")
        );
    }
}
