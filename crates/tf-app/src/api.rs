use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, multipart};
use url::Url;

use tf_core::api::{self, GenerationRequest, GenerationResult, HealthReport};
use tf_core::upload::UploadedImage;

use crate::error::AppError;

/// Health probes should answer quickly; generation requests get no client
/// deadline and run until the transport gives up.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Checking,
    Healthy,
    Offline,
}

impl ApiStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Checking => "Checking...",
            Self::Healthy => "API Online",
            Self::Offline => "API Offline",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::Checking => "⏳",
            Self::Healthy => "✅",
            Self::Offline => "❌",
        }
    }

    pub fn color(&self) -> egui::Color32 {
        match self {
            Self::Checking => egui::Color32::GRAY,
            Self::Healthy => egui::Color32::GREEN,
            Self::Offline => egui::Color32::RED,
        }
    }
}

/// Blocking HTTP client for the toy generation service. Lives on worker
/// threads, never on the UI thread. Cloning shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(None).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Service(format!("invalid endpoint {path}: {e}")))
    }

    /// GET /health. Any 2xx response counts as healthy; the body is parsed
    /// opportunistically for the status badge detail.
    pub fn health(&self) -> Result<HealthReport, AppError> {
        let url = self.endpoint("health")?;
        let response = self.http.get(url).timeout(HEALTH_TIMEOUT).send()?;

        if !response.status().is_success() {
            return Err(AppError::Service(format!(
                "health check returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().unwrap_or_default())
    }

    /// POST the multipart generation request to the endpoint the mode
    /// selects. Non-2xx responses surface the body's `detail` field,
    /// falling back to a generic message.
    pub fn generate(
        &self,
        person: &UploadedImage,
        style_guide: &UploadedImage,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, AppError> {
        let url = self.endpoint(request.mode.endpoint())?;

        let mut form = multipart::Form::new()
            .part(api::FIELD_PERSON_IMAGE, image_part(person)?)
            .part(api::FIELD_STYLE_GUIDE, image_part(style_guide)?);
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }

        info!("submitting generation request to {url}");
        let response = self.http.post(url).multipart(form).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            debug!("generation failed with HTTP {status}: {body}");
            return Err(AppError::Service(api::failure_message(&body)));
        }

        Ok(response.json()?)
    }

    /// Fetch raw bytes from the download endpoint, used to embed the
    /// generated toy image in the result view.
    pub fn fetch(&self, artifact_path: &str) -> Result<Vec<u8>, AppError> {
        let url = self.download_url(artifact_path)?;
        let response = self.http.get(url).send()?;

        if !response.status().is_success() {
            return Err(AppError::Service(format!(
                "download returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.bytes()?.to_vec())
    }

    pub fn download_url(&self, artifact_path: &str) -> Result<Url, AppError> {
        api::download_url(&self.base, artifact_path).map_err(|e| AppError::Service(e.to_string()))
    }
}

fn image_part(image: &UploadedImage) -> Result<multipart::Part, AppError> {
    let part = multipart::Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime)?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(Url::parse("http://localhost:8000/").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_selection() {
        let client = client();
        assert_eq!(
            client.endpoint("/generate-toy").unwrap().as_str(),
            "http://localhost:8000/generate-toy"
        );
        assert_eq!(
            client.endpoint("health").unwrap().as_str(),
            "http://localhost:8000/health"
        );
    }

    #[test]
    fn test_download_url_percent_encodes() {
        let client = client();
        let url = client.download_url("outputs/preview_1.mp4").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/download/outputs%2Fpreview_1.mp4"
        );
    }
}
