use crate::api::GenerationRequest;
use crate::format::OutputFormat;
use crate::mode::GenerationMode;
use crate::upload::UploadedImage;

/// The two required input image slots. They are independent; each is
/// replaced wholesale when a new file is selected or dropped on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Person,
    StyleGuide,
}

impl ImageSlot {
    pub fn label(&self) -> &str {
        match self {
            Self::Person => "Person Photo",
            Self::StyleGuide => "Style Guide",
        }
    }

    pub fn hint(&self) -> &str {
        match self {
            Self::Person => "A clear photo of the person to turn into a toy",
            Self::StyleGuide => "A toy figure whose art style should be matched",
        }
    }
}

/// All user-entered state of the generation form.
#[derive(Debug, Clone, Default)]
pub struct ToyForm {
    pub person: Option<UploadedImage>,
    pub style_guide: Option<UploadedImage>,
    pub prompt: String,
    pub mode: GenerationMode,
    pub format: OutputFormat,
}

impl ToyForm {
    pub fn image(&self, slot: ImageSlot) -> Option<&UploadedImage> {
        match slot {
            ImageSlot::Person => self.person.as_ref(),
            ImageSlot::StyleGuide => self.style_guide.as_ref(),
        }
    }

    pub fn set_image(&mut self, slot: ImageSlot, image: UploadedImage) {
        match slot {
            ImageSlot::Person => self.person = Some(image),
            ImageSlot::StyleGuide => self.style_guide = Some(image),
        }
    }

    /// Submission is only permitted when both images are present and the
    /// prompt is non-blank.
    pub fn ready(&self) -> bool {
        self.person.is_some() && self.style_guide.is_some() && !self.prompt.trim().is_empty()
    }

    /// Request parameters for the current form contents, if submittable.
    pub fn request(&self) -> Option<GenerationRequest> {
        if !self.ready() {
            return None;
        }
        Some(GenerationRequest {
            prompt: self.prompt.trim().to_string(),
            mode: self.mode,
            format: self.format,
        })
    }

    /// Back to the initial empty form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedImage {
        UploadedImage::from_parts(name, "image/png", vec![0; 64]).unwrap()
    }

    fn filled() -> ToyForm {
        let mut form = ToyForm::default();
        form.set_image(ImageSlot::Person, png("person.png"));
        form.set_image(ImageSlot::StyleGuide, png("style.png"));
        form.prompt = "a chibi vinyl figure".to_string();
        form
    }

    #[test]
    fn test_not_ready_without_both_images() {
        let mut form = filled();
        form.person = None;
        assert!(!form.ready());
        assert!(form.request().is_none());

        let mut form = filled();
        form.style_guide = None;
        assert!(!form.ready());
    }

    #[test]
    fn test_not_ready_with_blank_prompt() {
        let mut form = filled();
        form.prompt = "   \n".to_string();
        assert!(!form.ready());
        assert!(form.request().is_none());
    }

    #[test]
    fn test_request_trims_prompt() {
        let mut form = filled();
        form.prompt = "  a toy  ".to_string();
        let req = form.request().unwrap();
        assert_eq!(req.prompt, "a toy");
        assert_eq!(req.mode, GenerationMode::Full);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = filled();
        form.mode = GenerationMode::ImageOnly;
        form.format = OutputFormat::All;
        form.reset();

        assert!(form.person.is_none());
        assert!(form.style_guide.is_none());
        assert!(form.prompt.is_empty());
        assert_eq!(form.mode, GenerationMode::Full);
        assert_eq!(form.format, OutputFormat::Gaussian);
    }
}
